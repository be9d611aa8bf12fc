pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use models::{Limit, QuotaCounters, Resource, Tier};
pub use repositories::{PgQuotaRepository, QuotaRepository};
pub use services::QuotaService;
