//! Pipeline orchestration - wires together all extraction stages.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, Settings};
use crate::error::{OcrError, Result};
use crate::ocr::{GeminiClient, OcrClient, RetryPolicy, SharedClient};
use crate::types::{OcrResponse, UsageMetadata, USAGE_METADATA_KEY};

use super::decode::load_image;
use super::prompts::{PromptCache, EXTRACTION_PROMPT_PATH, SYSTEM_PROMPT_PATH};

type ClientFactory = dyn Fn(Arc<Settings>, &Config) -> Result<Arc<dyn OcrClient>> + Send + Sync;

/// Composition root for the extraction pipeline.
///
/// Owns the settings, the prompt cache and the shared OCR client, so all of
/// them live exactly as long as this value. The client is built on first use
/// and reused by every later run.
pub struct Scribe {
    config: Config,
    settings: Arc<Settings>,
    prompts: PromptCache,
    client: SharedClient<dyn OcrClient>,
    factory: Box<ClientFactory>,
    retry: RetryPolicy,
}

impl Scribe {
    /// Create a pipeline backed by the Gemini client.
    pub fn new(config: Config, settings: Settings) -> Self {
        Self::with_client_factory(config, settings, |settings, config| {
            let client = GeminiClient::new(settings, config)?;
            Ok(Arc::new(client) as Arc<dyn OcrClient>)
        })
    }

    /// Create a pipeline from the config file and the process environment.
    pub fn from_env() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::new(config, Settings::from_env()))
    }

    /// Create a pipeline whose client is built by `factory` on first use.
    pub fn with_client_factory<F>(config: Config, settings: Settings, factory: F) -> Self
    where
        F: Fn(Arc<Settings>, &Config) -> Result<Arc<dyn OcrClient>> + Send + Sync + 'static,
    {
        let retry = RetryPolicy::from_config(&config.retry, &config.limits);
        Self {
            config,
            settings: Arc::new(settings),
            prompts: PromptCache::new(),
            client: SharedClient::new(),
            factory: Box::new(factory),
            retry,
        }
    }

    /// Replace the retry policy derived from the config.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompts(&self) -> &PromptCache {
        &self.prompts
    }

    /// The shared OCR client, built on the first call.
    pub fn client(&self) -> Result<Arc<dyn OcrClient>> {
        self.client
            .get_or_try_init(|| (self.factory)(Arc::clone(&self.settings), &self.config))
    }

    /// Run the full pipeline on one image.
    ///
    /// Load image, fetch prompts, call the client (with retry), parse the
    /// response as JSON and attach usage metadata when reported.
    pub async fn run_pipeline(&self, image_path: &str) -> Result<Value> {
        let start = Instant::now();
        tracing::info!("Processing image: {image_path}");

        let path = image_path.to_string();
        let limits = self.config.limits.clone();
        let image = tokio::task::spawn_blocking(move || load_image(&path, &limits))
            .await
            .map_err(|e| OcrError::Pipeline(format!("Image loading task failed: {e}")))??;

        let root = self.config.prompt_root();
        let system_prompt = self.prompts.get_prompt(&root.join(SYSTEM_PROMPT_PATH))?;
        let user_prompt = self.prompts.get_prompt(&root.join(EXTRACTION_PROMPT_PATH))?;

        let client = self.client()?;
        let response = self
            .retry
            .run(|| client.extract(&image, &system_prompt, &user_prompt))
            .await?;
        tracing::debug!(
            "{} responded in {}ms ({} chars, model {})",
            client.name(),
            response.latency_ms,
            response.text.len(),
            response.model
        );

        let result = assemble_result(&response)?;
        tracing::info!(
            "Extracted {} in {:?}",
            image.path.display(),
            start.elapsed()
        );
        Ok(result)
    }
}

/// Parse the response text and inject `usage_metadata` when usage was reported.
pub fn assemble_result(response: &OcrResponse) -> Result<Value> {
    let mut data: Value = serde_json::from_str(&response.text)
        .map_err(|e| OcrError::JsonParse(format!("Failed to parse JSON response: {e}")))?;

    if let Some(usage) = response.usage {
        let usage = serde_json::to_value(UsageMetadata::from(usage))
            .map_err(|e| OcrError::Pipeline(e.to_string()))?;
        match data.as_object_mut() {
            Some(object) => {
                object.insert(USAGE_METADATA_KEY.to_string(), usage);
            }
            None => {
                return Err(OcrError::Pipeline(
                    "cannot attach usage metadata to a JSON result that is not an object"
                        .to_string(),
                ));
            }
        }
    }

    Ok(data)
}
