//! HTTP client for the generation API.

use std::time::Duration;

use easel_core::error::CoreError;
use easel_core::prompt::CompiledPrompt;

use crate::wire::{ApiErrorBody, Candidate, GenerateContentRequest, GenerateContentResponse};

/// Finish reasons that mark a candidate as safety-rejected. Such candidates
/// are dropped individually rather than failing the whole request.
const SAFETY_FINISH_REASONS: &[&str] =
    &["SAFETY", "IMAGE_SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Keywords in upstream error messages that indicate a safety block. This
/// is the one place message text is inspected: the upstream API reports
/// safety rejections only through its message, so we classify once here
/// and carry a typed error from then on.
const SAFETY_KEYWORDS: &[&str] = &["safety", "blocked", "prohibited"];

/// Connection settings for the generation API.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com`.
    pub api_url: String,
    pub api_key: String,
    /// Wall-clock budget per generation call.
    pub timeout: Duration,
}

/// One successfully extracted image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// `data:<mime>;base64,<payload>` -- forwarded opaquely to the client.
    pub data_url: String,
    pub mime_type: String,
}

/// Client for the generation API. Cheap to clone (shares the underlying
/// connection pool).
#[derive(Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    config: GenAiConfig,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Issue one generation call and extract the surviving images.
    ///
    /// The caller must not assume the returned count equals the requested
    /// candidate count: safety-rejected and payload-less candidates are
    /// dropped individually.
    pub async fn generate(
        &self,
        model: &str,
        compiled: &CompiledPrompt,
    ) -> Result<Vec<GeneratedImage>, CoreError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, model
        );
        let body = GenerateContentRequest::from_compiled(compiled);

        tracing::debug!(
            model,
            segments = compiled.segments.len(),
            candidates = compiled.config.candidate_count,
            "Calling generation API"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.classify_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure_body(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("Malformed generation response: {e}")))?;

        extract_images(parsed.candidates)
    }

    fn classify_request_error(&self, e: reqwest::Error) -> CoreError {
        if e.is_timeout() {
            CoreError::Timeout(self.config.timeout.as_secs())
        } else {
            CoreError::Upstream(format!("Request to generation API failed: {e}"))
        }
    }
}

/// Map a non-success upstream response to a typed error. Prefers the
/// structured error body; falls back to a generic status message.
fn classify_failure_body(status: u16, body: &str) -> CoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("Generation API returned status {status}"));

    let lowered = message.to_ascii_lowercase();
    if SAFETY_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        CoreError::ContentRejected(message)
    } else {
        CoreError::Upstream(message)
    }
}

/// Filter and extract images from the candidate list, preserving upstream
/// order.
fn extract_images(candidates: Vec<Candidate>) -> Result<Vec<GeneratedImage>, CoreError> {
    if candidates.is_empty() {
        return Err(CoreError::NoCandidates);
    }

    let mut images = Vec::new();
    for (idx, candidate) in candidates.into_iter().enumerate() {
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if SAFETY_FINISH_REASONS.contains(&reason) {
                tracing::warn!(candidate = idx, reason, "Candidate dropped by safety filter");
                continue;
            }
        }

        let inline = candidate
            .content
            .into_iter()
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data);

        match inline {
            Some(data) => images.push(GeneratedImage {
                data_url: format!("data:{};base64,{}", data.mime_type, data.data),
                mime_type: data.mime_type,
            }),
            None => {
                tracing::warn!(candidate = idx, "Candidate had no inline image payload");
            }
        }
    }

    if images.is_empty() {
        return Err(CoreError::NoValidImages);
    }
    Ok(images)
}
