//! Infrastructure clients for external services
//!
//! Blob storage and the generative-model API sit behind traits so the
//! pipeline can run against in-memory doubles in tests.

pub mod llm;
pub mod storage;
