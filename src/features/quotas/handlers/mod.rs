pub mod usage_handler;

pub use usage_handler::{__path_get_usage, get_usage};
