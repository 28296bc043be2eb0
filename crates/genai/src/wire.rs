//! Serde types for the upstream `generateContent` wire contract.
//!
//! The upstream API is camelCase JSON. Optional fields are omitted from
//! serialization entirely -- the API rejects explicit nulls in
//! `imageConfig`.

use easel_core::prompt::{CompiledPrompt, Segment};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfigWire,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part: exactly one of `text` or `inline_data` is set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// A base64 image blob paired with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfigWire {
    /// Always `["IMAGE"]`: this proxy only requests image output.
    pub response_modalities: Vec<&'static str>,
    pub candidate_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfigWire>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfigWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

impl GenerateContentRequest {
    /// Build the wire request from a compiled prompt. Segment order is
    /// preserved exactly; the model disambiguates image roles positionally.
    pub fn from_compiled(compiled: &CompiledPrompt) -> Self {
        let parts = compiled
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => Part {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                Segment::InlineImage { mime_type, data } => Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime_type.clone(),
                        data: data.clone(),
                    }),
                },
            })
            .collect();

        let image_config = if compiled.config.aspect_ratio.is_some()
            || compiled.config.image_size.is_some()
        {
            Some(ImageConfigWire {
                aspect_ratio: compiled.config.aspect_ratio.clone(),
                image_size: compiled.config.image_size.clone(),
            })
        } else {
            None
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfigWire {
                response_modalities: vec!["IMAGE"],
                candidate_count: compiled.config.candidate_count,
                image_config,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One proposed output from the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation of this candidate stopped (e.g. `STOP`, `SAFETY`).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Structured error body: `{"error": {"message": ..., "status": ...}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::prompt::{compile, GenerationRequest};
    use easel_core::pricing::model_spec;

    #[test]
    fn request_omits_absent_image_config() {
        let request = GenerationRequest {
            prompt: "a fox".to_string(),
            ..Default::default()
        };
        let compiled = compile(&request, model_spec("gemini-2.5-flash-image").unwrap());
        let wire = GenerateContentRequest::from_compiled(&compiled);

        let json = serde_json::to_value(&wire).unwrap();
        assert!(json["generationConfig"].get("imageConfig").is_none());
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
        assert_eq!(json["generationConfig"]["candidateCount"], 1);
    }

    #[test]
    fn request_preserves_segment_order() {
        let request = GenerationRequest {
            prompt: "warmer".to_string(),
            operation: easel_core::prompt::Operation::Edit,
            base_image: Some(easel_core::prompt::ImageInput {
                data: Some("abc".to_string()),
                mime_type: Some("image/png".to_string()),
            }),
            aspect_ratio: Some("1:1".to_string()),
            ..Default::default()
        };
        let compiled = compile(&request, model_spec("gemini-2.5-flash-image").unwrap());
        let wire = GenerateContentRequest::from_compiled(&compiled);

        let parts = &wire.contents[0].parts;
        assert_eq!(parts.len(), 4);
        assert!(parts[0].text.is_some());
        assert!(parts[1].text.as_deref().unwrap().starts_with("BASE_IMAGE:"));
        assert_eq!(parts[2].inline_data.as_ref().unwrap().data, "abc");
        assert!(parts[3].text.as_deref().unwrap().contains("warmer"));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
        // Unsupported hints never appear, not even as null.
        assert!(json["generationConfig"]["imageConfig"]
            .get("imageSize")
            .is_none());
    }

    #[test]
    fn response_parses_with_missing_fields() {
        let body = r#"{"candidates": [{"finishReason": "STOP"}, {}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert!(parsed.candidates[1].content.is_none());

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());
    }
}
