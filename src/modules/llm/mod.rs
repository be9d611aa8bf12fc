//! Generative-model client
//!
//! `TextCompletion` is a black box: system prompt plus user prompt in,
//! raw text out. Structured parsing happens in the callers.

mod anthropic_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use anthropic_client::AnthropicClient;

#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Run one completion. Non-2xx upstream responses map to
    /// `AppError::GenerationService` carrying the status and body.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, AppError>;
}
