//! Scribe Core - image to structured JSON extraction.
//!
//! Scribe sends an image plus a system prompt and an extraction prompt to a
//! multimodal model (Google Gemini) and returns the model's JSON answer as a
//! parsed document, optionally enriched with token usage.
//!
//! # Architecture
//!
//! ```text
//! Path → Validate → Decode → Prompts (cached) → Gemini (retry) → Parse → Usage → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scribe_core::Scribe;
//!
//! #[tokio::main]
//! async fn main() -> scribe_core::Result<()> {
//!     let scribe = Scribe::from_env()?;
//!     let result = scribe.run_pipeline("images/sample.webp").await?;
//!     println!("{}", scribe_core::to_pretty_json(&result)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod types;

pub use config::{Config, Settings};
pub use error::{ConfigError, ErrorKind, OcrError, Result};
pub use ocr::{GeminiClient, OcrClient, RetryPolicy};
pub use output::to_pretty_json;
pub use pipeline::{LoadedImage, Scribe};
pub use types::{OcrResponse, TokenUsage, UsageMetadata};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
