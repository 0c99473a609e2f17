//! Remote OCR integration.
//!
//! Provides the [`OcrClient`] capability, the Gemini backend that implements
//! it, the retry policy wrapped around each extraction, and the construct-once
//! handle the pipeline keeps its client in.

pub mod client;
pub mod gemini;
pub mod retry;
pub mod shared;

pub use client::{ImageInput, OcrClient};
pub use gemini::GeminiClient;
pub use retry::RetryPolicy;
pub use shared::SharedClient;
