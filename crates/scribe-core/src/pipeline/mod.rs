//! Extraction pipeline stages.
//!
//! - **validate**: Path checks before an image is opened
//! - **decode**: Load, decode and check an image
//! - **prompts**: Prompt template reading and caching
//! - **processor**: Orchestrates the full run

pub mod decode;
pub mod processor;
pub mod prompts;
pub mod validate;

// Re-exports for convenient access
pub use decode::{check_properties, load_image, LoadedImage};
pub use processor::{assemble_result, Scribe};
pub use prompts::{read_file, PromptCache, EXTRACTION_PROMPT_PATH, SYSTEM_PROMPT_PATH};
pub use validate::validate_path;
