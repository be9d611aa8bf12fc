//! Append-only user activity log, read back newest first by the dashboard

pub mod models;
pub mod repositories;

pub use models::{ActivityEntry, NewActivity};
pub use repositories::{ActivityRepository, PgActivityRepository};
