//! Prompt template loading with a process-lifetime cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{OcrError, Result};

/// System instruction template, relative to the prompt root.
pub const SYSTEM_PROMPT_PATH: &str = "prompts/system.txt";

/// Extraction (user) prompt template, relative to the prompt root.
pub const EXTRACTION_PROMPT_PATH: &str = "prompts/extraction.txt";

/// Read a UTF-8 text file.
///
/// Missing paths, non-files, I/O failures and invalid UTF-8 are all
/// [`OcrError::Validation`].
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(OcrError::Validation(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(OcrError::Validation(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }
    std::fs::read_to_string(path).map_err(|e| {
        OcrError::Validation(format!("Failed to read file {}: {e}", path.display()))
    })
}

type Reader = dyn Fn(&Path) -> Result<String> + Send + Sync;

/// Caches prompt text by path. Entries are never evicted.
pub struct PromptCache {
    reader: Box<Reader>,
    entries: Mutex<HashMap<PathBuf, String>>,
}

impl PromptCache {
    pub fn new() -> Self {
        Self::with_reader(read_file)
    }

    /// Cache backed by a custom reader.
    pub fn with_reader<F>(reader: F) -> Self
    where
        F: Fn(&Path) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            reader: Box::new(reader),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the prompt at `path`, reading it on first use only.
    ///
    /// Failed reads are not cached.
    pub fn get_prompt(&self, path: &Path) -> Result<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(text) = entries.get(path) {
            return Ok(text.clone());
        }
        let text = (self.reader)(path)?;
        tracing::debug!("Cached prompt {} ({} bytes)", path.display(), text.len());
        entries.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    /// Number of cached prompts.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PromptCache {
    fn default() -> Self {
        Self::new()
    }
}
