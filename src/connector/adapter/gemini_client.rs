use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{DomainError, MessageRole, Prompt};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION_PATH: &str = "/v1beta/models";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent<'a>>,
    contents: Vec<ApiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// HTTP client for the Gemini `generateContent` API.
///
/// System messages travel as `systemInstruction`; history and input travel as
/// `contents` with assistant turns under the `model` role. One request per
/// call, bounded by the configured timeout.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    /// Full endpoint URL for `model`.
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let model: String = model.into();
        let base: String = base_url.into();
        let url = format!(
            "{}{}/{}:generateContent",
            base.trim_end_matches('/'),
            API_VERSION_PATH,
            model
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model,
            temperature,
            url,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(&self, prompt: &'a Prompt, system: Option<&'a str>) -> ApiRequest<'a> {
        let contents = prompt
            .conversation()
            .map(|message| ApiContent {
                role: Some(match message.role() {
                    MessageRole::Assistant => "model",
                    _ => "user",
                }),
                parts: vec![ApiPart {
                    text: message.content(),
                }],
            })
            .collect();

        ApiRequest {
            system_instruction: system.map(|text| ApiContent {
                role: None,
                parts: vec![ApiPart { text }],
            }),
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    fn extract_text(response: ApiResponse) -> Result<String, DomainError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(DomainError::model(format!("GeminiClient: {reason}")));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DomainError::model("GeminiClient: empty completion"));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let system = prompt.system_instruction();
        let request = self.build_request(prompt, system.as_deref());

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::model(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::model(format!(
                "GeminiClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::model(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        let text = Self::extract_text(api_response)?;
        debug!("GeminiClient: {} chars from {}", text.len(), self.model);
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
