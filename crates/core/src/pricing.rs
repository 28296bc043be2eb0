//! Static cost model for the supported generation models.
//!
//! Each model has a fixed per-image credit price. Requested variation
//! counts are clamped to [`MIN_CANDIDATES`]..=[`MAX_CANDIDATES`] before
//! pricing; the generation config uses the same constants, so the two
//! clamps agree by construction.

use crate::error::CoreError;
use crate::types::Credits;

/// Minimum image variations per request.
pub const MIN_CANDIDATES: u32 = 1;
/// Maximum image variations per request (upstream API limit).
pub const MAX_CANDIDATES: u32 = 4;

/// Capabilities and price of one supported generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Upstream model identifier.
    pub id: &'static str,
    /// Credits charged per delivered image.
    pub credits_per_image: Credits,
    /// Whether the model's image config accepts an aspect-ratio hint.
    pub supports_aspect_ratio: bool,
    /// Whether the model's image config additionally accepts a size hint
    /// (e.g. "1K", "2K", "4K").
    pub supports_image_size: bool,
}

/// The price table. Order is the order shown to clients in error messages.
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "gemini-2.5-flash-image",
        credits_per_image: 8,
        supports_aspect_ratio: true,
        supports_image_size: false,
    },
    ModelSpec {
        id: "gemini-3-pro-image-preview",
        credits_per_image: 24,
        supports_aspect_ratio: true,
        supports_image_size: true,
    },
];

/// Identifiers of all priced models.
pub fn valid_models() -> Vec<&'static str> {
    MODELS.iter().map(|m| m.id).collect()
}

/// Look up a model by identifier.
pub fn model_spec(model: &str) -> Result<&'static ModelSpec, CoreError> {
    MODELS
        .iter()
        .find(|m| m.id == model)
        .ok_or_else(|| CoreError::InvalidModel {
            model: model.to_string(),
            valid: valid_models(),
        })
}

/// Clamp a requested variation count into the supported range.
/// A missing count means one image.
pub fn clamp_candidate_count(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(MIN_CANDIDATES)
        .clamp(MIN_CANDIDATES, MAX_CANDIDATES)
}

/// Total credit cost for `count` images of `model`, after clamping.
pub fn price_of(model: &str, count: Option<u32>) -> Result<Credits, CoreError> {
    let spec = model_spec(model)?;
    Ok(spec.credits_per_image * Credits::from(clamp_candidate_count(count)))
}

/// Cost for an already-known delivered count (no clamping; callers pass
/// the length of the delivered image list).
pub fn cost_for_delivered(model: &str, delivered: usize) -> Result<Credits, CoreError> {
    let spec = model_spec(model)?;
    Ok(spec.credits_per_image * delivered as Credits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn known_models_are_priced() {
        assert_eq!(price_of("gemini-2.5-flash-image", Some(1)).unwrap(), 8);
        assert_eq!(price_of("gemini-3-pro-image-preview", Some(2)).unwrap(), 48);
    }

    #[test]
    fn unknown_model_lists_valid_choices() {
        let err = price_of("dall-e-9", Some(1)).unwrap_err();
        assert_matches!(err, CoreError::InvalidModel { ref model, ref valid }
            if model == "dall-e-9" && valid.contains(&"gemini-2.5-flash-image"));
    }

    #[test]
    fn count_is_clamped_to_supported_range() {
        assert_eq!(clamp_candidate_count(None), 1);
        assert_eq!(clamp_candidate_count(Some(0)), 1);
        assert_eq!(clamp_candidate_count(Some(4)), 4);
        assert_eq!(clamp_candidate_count(Some(99)), 4);
        // Pricing uses the clamped count.
        assert_eq!(price_of("gemini-2.5-flash-image", Some(99)).unwrap(), 32);
    }

    #[test]
    fn delivered_cost_is_per_actual_image() {
        assert_eq!(cost_for_delivered("gemini-2.5-flash-image", 2).unwrap(), 16);
        assert_eq!(cost_for_delivered("gemini-2.5-flash-image", 0).unwrap(), 0);
    }
}
