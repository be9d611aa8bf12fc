//! Helpers for turning raw model output into typed values.

pub mod parser;

pub use parser::{parse_llm_json, parse_llm_json_strict};
