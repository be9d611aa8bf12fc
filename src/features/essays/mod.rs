//! Model-written feedback on essays answering a generated prompt

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EssayService;
