//! Gemini OCR backend using the `generateContent` REST endpoint.
//!
//! Sends the system prompt as a system instruction and the image + user
//! prompt as a single user turn, asking for a JSON response.

use super::client::{ImageInput, OcrClient};
use crate::config::{Config, Settings};
use crate::error::{OcrError, Result};
use crate::pipeline::LoadedImage;
use crate::types::{OcrResponse, TokenUsage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

const JSON_MIME_TYPE: &str = "application/json";

/// Gemini backend. Owns one HTTP client for its whole lifetime.
pub struct GeminiClient {
    api_key: String,
    settings: Arc<Settings>,
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Resolve the API key and open the HTTP client.
    ///
    /// A missing key is a [`OcrError::Configuration`]; any other construction
    /// failure is an [`OcrError::Api`].
    pub fn new(settings: Arc<Settings>, config: &Config) -> Result<Self> {
        let api_key = settings.api_key().map_err(|e| {
            OcrError::Configuration(format!("Failed to initialize Gemini client: {e}"))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.limits.request_timeout_ms))
            .build()
            .map_err(|e| OcrError::api(format!("Failed to create Gemini client: {e}")))?;

        tracing::debug!("Gemini client ready ({})", config.gemini.endpoint);

        Ok(Self {
            api_key,
            settings,
            client,
            endpoint: config.gemini.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.endpoint)
    }

    fn build_request(
        &self,
        image: &LoadedImage,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<GenerateRequest> {
        Ok(GenerateRequest::new(
            ImageInput::from_image(image),
            system_prompt,
            user_prompt,
            self.settings.temperature()?,
            self.settings.top_p()?,
        ))
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn new(
        image: ImageInput,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
        top_p: f64,
    ) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: image.media_type,
                            data: image.data,
                        },
                    },
                    Part::Text {
                        text: user_prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature,
                top_p,
                response_mime_type: JSON_MIME_TYPE.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    response_mime_type: String,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageCounts>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageCounts {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

/// Validated pieces of a Gemini response.
struct Interpreted {
    text: String,
    usage: Option<TokenUsage>,
    model_version: Option<String>,
}

/// Apply the response checks in order: empty, blocked, empty text.
fn interpret(body: &str) -> Result<Interpreted> {
    if body.trim().is_empty() {
        return Err(OcrError::api("Empty response from Gemini API"));
    }
    let resp: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::api(format!("Failed to parse Gemini response: {e}")))?;

    if resp.candidates.is_empty() && resp.prompt_feedback.is_none() {
        return Err(OcrError::api("Empty response from Gemini API"));
    }

    if let Some(reason) = resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(OcrError::api(format!(
            "Content blocked by safety filters: {reason}"
        )));
    }

    let candidate = resp.candidates.first();
    let text: String = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let message = match candidate.and_then(|c| c.finish_reason.as_deref()) {
            Some(reason) => format!("Empty response text from Gemini API (finish reason: {reason})"),
            None => "Empty response text from Gemini API".to_string(),
        };
        return Err(OcrError::api(message));
    }

    let usage = resp.usage_metadata.map(|u| TokenUsage {
        input_tokens: u.prompt_token_count.unwrap_or(0),
        output_tokens: u.candidates_token_count.unwrap_or(0),
    });

    Ok(Interpreted {
        text,
        usage,
        model_version: resp.model_version,
    })
}

#[async_trait]
impl OcrClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn extract(
        &self,
        image: &LoadedImage,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<OcrResponse> {
        let start = Instant::now();
        let model = self.settings.model_id()?;
        let body = self.build_request(image, system_prompt, user_prompt)?;

        tracing::debug!(
            "Calling Gemini model {model} ({} bytes, {})",
            image.bytes.len(),
            image.mime_type()
        );

        let resp = self
            .client
            .post(self.url(&model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::api(format!("Gemini API call failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| OcrError::api(format!("Failed to read Gemini response: {e}")))?;
        if !status.is_success() {
            return Err(OcrError::Api {
                message: format!("Gemini HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let interpreted = interpret(&text)?;
        Ok(OcrResponse {
            text: interpreted.text,
            usage: interpreted.usage,
            model: interpreted.model_version.unwrap_or(model),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{API_KEY_VAR, MODEL_VAR, TEMPERATURE_VAR};
    use crate::error::ErrorKind;
    use image::{DynamicImage, ImageFormat};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn settings(pairs: &[(&str, &str)]) -> Arc<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(Settings::with_source(move |key| map.get(key).cloned()))
    }

    fn tiny_image() -> LoadedImage {
        LoadedImage {
            path: PathBuf::from("receipt.png"),
            image: DynamicImage::new_rgb8(1, 1),
            bytes: vec![1, 2, 3],
            format: ImageFormat::Png,
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_new_without_api_key_is_configuration_error() {
        let err = GeminiClient::new(settings(&[]), &Config::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("Failed to initialize Gemini client"));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_extract_without_model_fails_before_network() {
        let client = GeminiClient::new(settings(&[(API_KEY_VAR, "key")]), &Config::default())
            .unwrap();
        let err = client
            .extract(&tiny_image(), "system", "user")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("GEMINI_MODEL"));
    }

    #[tokio::test]
    async fn test_extract_with_bad_temperature_is_configuration_error() {
        let client = GeminiClient::new(
            settings(&[
                (API_KEY_VAR, "key"),
                (MODEL_VAR, "gemini-2.0-flash"),
                (TEMPERATURE_VAR, "hot"),
            ]),
            &Config::default(),
        )
        .unwrap();
        let err = client
            .extract(&tiny_image(), "system", "user")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let mut config = Config::default();
        config.gemini.endpoint = "https://example.test/v1beta/".to_string();
        let client = GeminiClient::new(settings(&[(API_KEY_VAR, "key")]), &config).unwrap();
        assert_eq!(
            client.url("gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new(
            settings(&[(API_KEY_VAR, "key"), (TEMPERATURE_VAR, "0.2")]),
            &Config::default(),
        )
        .unwrap();
        let body = client
            .build_request(&tiny_image(), "You are an OCR engine.", "Extract fields.")
            .unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are an OCR engine."
        );
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["data"], "AQID");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "Extract fields.");
        assert_eq!(json["generationConfig"]["temperature"], 0.2);
        assert_eq!(json["generationConfig"]["topP"], 0.1);
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_interpret_success_with_usage() {
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 7, "totalTokenCount": 12},
            "modelVersion": "gemini-2.0-flash-001"
        }"#;
        let out = interpret(body).unwrap();
        assert_eq!(out.text, "{\"a\":1}");
        assert_eq!(
            out.usage,
            Some(TokenUsage {
                input_tokens: 5,
                output_tokens: 7
            })
        );
        assert_eq!(out.model_version.as_deref(), Some("gemini-2.0-flash-001"));
    }

    #[test]
    fn test_interpret_without_usage() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{}"}]}}]}"#;
        let out = interpret(body).unwrap();
        assert!(out.usage.is_none());
    }

    #[test]
    fn test_interpret_empty_body() {
        for body in ["", "  ", "{}"] {
            let err = interpret(body).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::Api);
            assert!(err.to_string().contains("Empty response from Gemini API"));
        }
    }

    #[test]
    fn test_interpret_blocked_includes_reason() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = interpret(body).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "Content blocked by safety filters: SAFETY");
    }

    #[test]
    fn test_interpret_empty_text_reports_finish_reason() {
        let body = r#"{"candidates": [{"finishReason": "RECITATION"}]}"#;
        let err = interpret(body).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("Empty response text"));
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    fn test_interpret_whitespace_text_is_passed_through() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   \n"}]},"finishReason":"STOP"}]}"#;
        let out = interpret(body).unwrap();
        assert_eq!(out.text, "   \n");
    }

    #[test]
    fn test_interpret_malformed_body_is_api_error() {
        let err = interpret("<html>bad gateway</html>").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("Failed to parse Gemini response"));
    }
}
