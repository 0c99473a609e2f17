//! Lazily resolved model settings.
//!
//! Each value is read from its source on first access and memoized for the
//! life of the [`Settings`] instance. Later changes to the environment are not
//! observed. Only successful resolutions are cached, so a missing required
//! value keeps failing with [`OcrError::Configuration`] on every access.

use crate::error::{OcrError, Result};
use std::fmt;
use std::sync::{Once, OnceLock};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const TEMPERATURE_VAR: &str = "TEMPERATURE";
pub const TOP_P_VAR: &str = "TOP_P";

pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_TOP_P: f64 = 0.1;

static DOTENV: Once = Once::new();

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Model credentials and sampling parameters.
pub struct Settings {
    lookup: Box<Lookup>,
    api_key: OnceLock<String>,
    model_id: OnceLock<String>,
    temperature: OnceLock<f64>,
    top_p: OnceLock<f64>,
}

impl Settings {
    /// Settings backed by the process environment.
    ///
    /// The first lookup loads a `.env` file from the working directory (or a
    /// parent) if one exists. That happens once per process.
    pub fn from_env() -> Self {
        Self::with_source(|key| {
            load_dotenv();
            std::env::var(key).ok()
        })
    }

    /// Settings backed by an arbitrary key lookup.
    pub fn with_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            api_key: OnceLock::new(),
            model_id: OnceLock::new(),
            temperature: OnceLock::new(),
            top_p: OnceLock::new(),
        }
    }

    pub fn api_key(&self) -> Result<String> {
        memoize(&self.api_key, || self.required(API_KEY_VAR))
    }

    pub fn model_id(&self) -> Result<String> {
        memoize(&self.model_id, || self.required(MODEL_VAR))
    }

    pub fn temperature(&self) -> Result<f64> {
        memoize(&self.temperature, || {
            self.optional_float(TEMPERATURE_VAR, DEFAULT_TEMPERATURE)
        })
    }

    pub fn top_p(&self) -> Result<f64> {
        memoize(&self.top_p, || self.optional_float(TOP_P_VAR, DEFAULT_TOP_P))
    }

    fn required(&self, key: &str) -> Result<String> {
        match (self.lookup)(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(OcrError::Configuration(format!(
                "{key} environment variable is not set"
            ))),
        }
    }

    fn optional_float(&self, key: &str, default: f64) -> Result<f64> {
        let raw = match (self.lookup)(key) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(default),
        };
        let value: f64 = raw.trim().parse().map_err(|e| {
            OcrError::Configuration(format!("Invalid value '{raw}' for {key}: {e}"))
        })?;
        if !value.is_finite() {
            return Err(OcrError::Configuration(format!(
                "Invalid value '{raw}' for {key}: must be a finite number"
            )));
        }
        Ok(value)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.get().map(|_| "<redacted>"))
            .field("model_id", &self.model_id.get())
            .field("temperature", &self.temperature.get())
            .field("top_p", &self.top_p.get())
            .finish()
    }
}

/// Return the cached value, or resolve and cache it. First writer wins.
fn memoize<T: Clone>(cell: &OnceLock<T>, resolve: impl FnOnce() -> Result<T>) -> Result<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }
    let value = resolve()?;
    Ok(cell.get_or_init(|| value).clone())
}

fn load_dotenv() {
    DOTENV.call_once(|| match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
    });
}
