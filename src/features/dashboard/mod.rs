//! Per-user study overview: totals, weakest sessions, streak and recent activity

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{DashboardRepository, PgDashboardRepository};
pub use services::DashboardService;
