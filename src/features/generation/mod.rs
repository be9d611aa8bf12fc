//! File-to-study-material generation pipeline

pub mod dtos;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::{MaterialGenerator, PipelineService, PipelineSettings};
