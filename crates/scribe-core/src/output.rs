//! JSON rendering for extraction results.
//!
//! Output uses a two-space indent. Strings are emitted as UTF-8, so non-ASCII
//! text is never escaped, and keys keep the order the model produced.

use crate::error::{OcrError, Result};
use serde_json::Value;

/// Render a pipeline result the way the CLI prints it.
pub fn to_pretty_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| OcrError::Pipeline(format!("Failed to render JSON: {e}")))
}
