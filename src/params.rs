//! Supported parameter sets, defaults, and option resolution.

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// The only image model the tool drives.
pub const MODEL_GPT_IMAGE_1: &str = "gpt-image-1";

/// Models accepted by the generation client.
pub const SUPPORTED_MODELS: &[&str] = &[MODEL_GPT_IMAGE_1];

/// Quality levels offered in the interactive menu, in menu order.
pub const QUALITY_AUTO: &str = "auto";
/// High quality.
pub const QUALITY_HIGH: &str = "high";
/// Medium quality.
pub const QUALITY_MEDIUM: &str = "medium";
/// Low quality.
pub const QUALITY_LOW: &str = "low";

/// Largest batch the provider accepts.
pub const MAX_IMAGES: u32 = 10;

/// Default values for settings and generation options.
pub mod defaults {
    /// Model.
    pub const MODEL: &str = super::MODEL_GPT_IMAGE_1;
    /// Square icon size.
    pub const SIZE: &str = "1024x1024";
    /// Quality.
    pub const QUALITY: &str = super::QUALITY_AUTO;
    /// Background.
    pub const BACKGROUND: &str = "auto";
    /// Output format.
    pub const OUTPUT_FORMAT: &str = "png";
    /// Moderation level.
    pub const MODERATION: &str = "auto";
    /// Images per request.
    pub const NUM_IMAGES: u32 = 1;
    /// Output directory.
    pub const OUTPUT_PATH: &str = "./output";
    /// UI language.
    pub const LANGUAGE: &str = "en";
    /// Provider endpoint root.
    pub const BASE_URL: &str = "https://api.katonai.dev";
}

/// Sizes accepted by a model.
#[must_use]
pub fn supported_sizes(model: &str) -> Option<&'static [&'static str]> {
    match model {
        MODEL_GPT_IMAGE_1 => Some(&["1024x1024", "1536x1024", "1024x1536"]),
        _ => None,
    }
}

/// Qualities accepted by a model.
#[must_use]
pub fn supported_qualities(model: &str) -> Option<&'static [&'static str]> {
    match model {
        MODEL_GPT_IMAGE_1 => Some(&[QUALITY_AUTO, QUALITY_HIGH, QUALITY_MEDIUM, QUALITY_LOW]),
        _ => None,
    }
}

/// Options for one generation call. Empty strings and a zero count mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Icon description.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Pixel size, e.g. `1024x1024`.
    pub size: String,
    /// Quality level.
    pub quality: String,
    /// Background mode.
    pub background: String,
    /// Output format.
    pub output_format: String,
    /// Moderation level.
    pub moderation: String,
    /// Number of images.
    pub num_images: u32,
    /// Send the prompt verbatim instead of wrapping it in the icon template.
    pub raw_prompt: bool,
}

impl GenerationOptions {
    /// Fill empty fields with their defaults.
    #[must_use]
    pub fn resolved(&self) -> Self {
        fn or(value: &str, fallback: &str) -> String {
            let chosen = if value.is_empty() { fallback } else { value };
            chosen.to_string()
        }
        Self {
            prompt: self.prompt.clone(),
            model: or(&self.model, defaults::MODEL),
            size: or(&self.size, defaults::SIZE),
            quality: or(&self.quality, defaults::QUALITY),
            background: or(&self.background, defaults::BACKGROUND),
            output_format: or(&self.output_format, defaults::OUTPUT_FORMAT),
            moderation: or(&self.moderation, defaults::MODERATION),
            num_images: if self.num_images == 0 { defaults::NUM_IMAGES } else { self.num_images },
            raw_prompt: self.raw_prompt,
        }
    }

    /// Check the resolved options against the supported sets.
    ///
    /// # Errors
    ///
    /// Returns the first unsupported model, size, quality, or count found.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let model = &self.model;
        if !SUPPORTED_MODELS.contains(&model.as_str()) {
            return Err(GenerateError::UnsupportedModel {
                model: model.clone(),
                supported: SUPPORTED_MODELS,
            });
        }

        let sizes = supported_sizes(model).unwrap_or_default();
        if !sizes.contains(&self.size.as_str()) {
            return Err(GenerateError::UnsupportedSize {
                size: self.size.clone(),
                model: model.clone(),
                valid: sizes,
            });
        }

        let qualities = supported_qualities(model).unwrap_or_default();
        if !qualities.contains(&self.quality.as_str()) {
            return Err(GenerateError::UnsupportedQuality {
                quality: self.quality.clone(),
                model: model.clone(),
                valid: qualities,
            });
        }

        if !(1..=MAX_IMAGES).contains(&self.num_images) {
            return Err(GenerateError::InvalidCount(self.num_images));
        }

        Ok(())
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpeg",
        "webp" => "webp",
        // png and anything unknown
        _ => "png",
    }
}
