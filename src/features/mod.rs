pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod essays;
pub mod files;
pub mod generation;
pub mod materials;
pub mod quotas;
pub mod study_sessions;
