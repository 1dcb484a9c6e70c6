//! AI text service client
//!
//! Talks to a Gemini-style `generateContent` endpoint. Only coaching text
//! and catalog estimates go through here; the numeric engine never does.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::AiConfig;

/// Errors from the AI text service
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("AI service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI returned an empty response. It might have been blocked by safety filters.")]
    EmptyResponse,

    #[error("AI returned invalid data format: {0}")]
    InvalidFormat(String),
}

/// Anything that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Gemini-style text client
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::NotConfigured);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: Secret::new(config.api_key.clone()),
        })
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn map_api_error(status: u16, response_text: &str) -> AiError {
        let message = serde_json::from_str::<GenerateResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);
        AiError::Api { status, message }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, AiError> {
        let text: String = response
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Sending request to AI text service");

        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Http(e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AiError::Http(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "AI text service error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = %e, "Failed to parse AI response");
            AiError::InvalidFormat(e.to_string())
        })?;

        if let Some(err) = parsed.error {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: err.message,
            });
        }

        Self::extract_text(parsed)
    }
}
