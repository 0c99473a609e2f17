//! Core data types shared between the OCR client and the pipeline.

use serde::{Deserialize, Serialize};

/// Note attached to every injected `usage_metadata` entry.
pub const USAGE_NOTE: &str = "Populated from Gemini API";

/// Key under which token accounting is injected into the result object.
pub const USAGE_METADATA_KEY: &str = "usage_metadata";

/// Token counts reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt (text + image)
    pub input_tokens: u32,
    /// Tokens produced by the model
    pub output_tokens: u32,
}

/// The `usage_metadata` object as it appears in the extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub note: String,
}

impl From<TokenUsage> for UsageMetadata {
    fn from(usage: TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            note: USAGE_NOTE.to_string(),
        }
    }
}

/// A validated, not-yet-parsed response from an OCR backend.
#[derive(Debug, Clone)]
pub struct OcrResponse {
    /// Raw response text (expected to be JSON)
    pub text: String,
    /// Token accounting, if the service reported it
    pub usage: Option<TokenUsage>,
    /// Model identifier used
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_metadata_serializes_with_note() {
        let usage = UsageMetadata::from(TokenUsage {
            input_tokens: 5,
            output_tokens: 7,
        });
        let value = serde_json::to_value(&usage).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "input_tokens": 5,
                "output_tokens": 7,
                "note": "Populated from Gemini API"
            })
        );
    }
}
