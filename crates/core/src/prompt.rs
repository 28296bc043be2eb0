//! Prompt compiler: turns a generation request into the ordered segment
//! list and generation config the upstream model expects.
//!
//! Segment order is load-bearing -- the model disambiguates image roles
//! positionally, so captions always immediately precede their image.

use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::{clamp_candidate_count, ModelSpec};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// The kind of generation being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Generate,
    Edit,
    Inpaint,
}

impl Operation {
    /// Parse an operation name. Unknown or empty input defaults to
    /// [`Operation::Generate`] (permissive by design: older plugin builds
    /// send operation names we no longer use).
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "edit" => Self::Edit,
            "inpaint" => Self::Inpaint,
            _ => Self::Generate,
        }
    }

    /// Stable name used in transaction records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Edit => "edit",
            Self::Inpaint => "inpaint",
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Operation::parse(&s))
    }
}

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// An image blob as sent by the plugin: base64 payload plus MIME type.
///
/// Both fields are optional at the wire level; an image missing either is
/// silently skipped during compilation rather than rejected, tolerating
/// partial client payloads.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ImageInput {
    /// Returns `(mime_type, data)` when both are present and non-empty.
    pub fn as_valid(&self) -> Option<(&str, &str)> {
        match (self.mime_type.as_deref(), self.data.as_deref()) {
            (Some(mime), Some(data)) if !mime.is_empty() && !data.is_empty() => {
                Some((mime, data))
            }
            _ => None,
        }
    }
}

/// The ephemeral generation request. Exists only for the duration of one
/// call; never persisted (the transaction log stores a truncated prompt
/// excerpt instead).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub operation: Operation,
    pub reference_images: Vec<ImageInput>,
    pub base_image: Option<ImageInput>,
    pub mask_image: Option<ImageInput>,
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
    pub candidate_count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Compiled output
// ---------------------------------------------------------------------------

/// One ordered content segment sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    InlineImage { mime_type: String, data: String },
}

/// Generation configuration. Image-only output is implied; optional hints
/// are omitted entirely (never null) when absent or unsupported by the
/// target model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub candidate_count: u32,
    pub aspect_ratio: Option<String>,
    pub image_size: Option<String>,
}

/// The compiled form of one request: ordered segments plus config.
#[derive(Debug, Clone)]
pub struct CompiledPrompt {
    pub segments: Vec<Segment>,
    pub config: GenerationConfig,
}

// ---------------------------------------------------------------------------
// Instruction templates
// ---------------------------------------------------------------------------

const GENERATE_INSTRUCTION: &str = "Generate a high-quality image matching the user's \
description. Use any REFERENCE images for identity, style, and composition guidance.";

const EDIT_INSTRUCTION: &str = "Edit the BASE_IMAGE according to the user's instructions. \
Preserve the composition, lighting, and every element the instructions do not mention. \
Use any REFERENCE images for identity and style guidance.";

const INPAINT_INSTRUCTION: &str = "You are editing a cropped region of a larger image. \
The MASK marks the area to change: white pixels must be modified, black pixels must be \
reproduced exactly from the BASE_CROP. Apply the user's instructions only inside the \
masked area and blend seamlessly at its edges.";

fn instruction_for(operation: Operation) -> &'static str {
    match operation {
        Operation::Generate => GENERATE_INSTRUCTION,
        Operation::Edit => EDIT_INSTRUCTION,
        Operation::Inpaint => INPAINT_INSTRUCTION,
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a request into the ordered segment list and config for `spec`.
///
/// Segment order (fixed):
/// 1. instruction text
/// 2. per reference image: `REFERENCE_i` caption, then the image (1-indexed)
/// 3. inpaint with mask + base: MASK caption + image, BASE_CROP caption + image
/// 4. edit with base: BASE_IMAGE caption + image
/// 5. the raw user prompt
pub fn compile(request: &GenerationRequest, spec: &ModelSpec) -> CompiledPrompt {
    let mut segments = Vec::new();

    segments.push(Segment::Text(instruction_for(request.operation).to_string()));

    for (idx, image) in request.reference_images.iter().enumerate() {
        let Some((mime, data)) = image.as_valid() else {
            continue;
        };
        segments.push(Segment::Text(format!(
            "REFERENCE_{n}: use this image as reference input {n}.",
            n = idx + 1
        )));
        segments.push(Segment::InlineImage {
            mime_type: mime.to_string(),
            data: data.to_string(),
        });
    }

    let base = request.base_image.as_ref().and_then(ImageInput::as_valid);
    let mask = request.mask_image.as_ref().and_then(ImageInput::as_valid);

    match (request.operation, mask, base) {
        (Operation::Inpaint, Some((mask_mime, mask_data)), Some((base_mime, base_data))) => {
            segments.push(Segment::Text(
                "MASK: white pixels mark the region to modify; black pixels must \
                 remain untouched."
                    .to_string(),
            ));
            segments.push(Segment::InlineImage {
                mime_type: mask_mime.to_string(),
                data: mask_data.to_string(),
            });
            segments.push(Segment::Text(
                "BASE_CROP: the cropped region of the original image being edited.".to_string(),
            ));
            segments.push(Segment::InlineImage {
                mime_type: base_mime.to_string(),
                data: base_data.to_string(),
            });
        }
        (Operation::Edit, _, Some((base_mime, base_data))) => {
            segments.push(Segment::Text("BASE_IMAGE: the image to edit.".to_string()));
            segments.push(Segment::InlineImage {
                mime_type: base_mime.to_string(),
                data: base_data.to_string(),
            });
        }
        _ => {}
    }

    segments.push(Segment::Text(format!("USER PROMPT:\n{}", request.prompt)));

    let config = GenerationConfig {
        candidate_count: clamp_candidate_count(request.candidate_count),
        aspect_ratio: spec
            .supports_aspect_ratio
            .then(|| request.aspect_ratio.clone())
            .flatten()
            .filter(|s| !s.is_empty()),
        image_size: spec
            .supports_image_size
            .then(|| request.resolution.clone())
            .flatten()
            .filter(|s| !s.is_empty()),
    };

    CompiledPrompt { segments, config }
}
