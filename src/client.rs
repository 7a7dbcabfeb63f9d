//! Icon generation client: validation, request construction, response normalization.

use base64::Engine;
use log::{debug, warn};

use crate::error::GenerateError;
use crate::params::GenerationOptions;
use crate::ports::{ImageApi, ProviderRequest};
use crate::request_log::RequestLog;

/// Wrap a user description in the square-icon template.
#[must_use]
pub fn icon_prompt(size: &str, prompt: &str) -> String {
    format!(
        "Create a full-bleed {size} px square app icon: {prompt}. \
         Crisp, minimal design with vibrant colors and a subtle inner bevel for gentle depth; \
         no hard shadows or outlines. Keep the subject centered with comfortable breathing room. \
         The background must fill 100% of the canvas edge-to-edge: no padding, no margins, \
         no borders, frames, or rounded corners. Clean, modern, flat-leaning style."
    )
}

/// Build the provider request from options. Options are resolved first.
#[must_use]
pub fn build_request(options: &GenerationOptions) -> ProviderRequest {
    let options = options.resolved();

    let prompt = if options.raw_prompt {
        options.prompt.clone()
    } else {
        icon_prompt(&options.size, &options.prompt)
    };

    let background = match options.background.as_str() {
        "transparent" => "transparent",
        "opaque" => "opaque",
        _ => "auto",
    };
    let output_format = match options.output_format.as_str() {
        "jpeg" => "jpeg",
        "webp" => "webp",
        _ => "png",
    };
    // auto maps to low
    let quality = match options.quality.as_str() {
        "high" => "high",
        "medium" => "medium",
        _ => "low",
    };

    ProviderRequest {
        model: options.model,
        prompt,
        n: options.num_images,
        size: options.size,
        quality: quality.to_string(),
        background: background.to_string(),
        output_format: output_format.to_string(),
        moderation: options.moderation,
    }
}

/// Generates icons through an [`ImageApi`] and returns base64 image data.
pub struct IconClient {
    api: Box<dyn ImageApi>,
    log: Option<RequestLog>,
}

impl IconClient {
    /// Create a client over the given API, optionally logging traffic.
    #[must_use]
    pub fn new(api: Box<dyn ImageApi>, log: Option<RequestLog>) -> Self {
        Self { api, log }
    }

    /// Generate images for `options`.
    ///
    /// Every entry of the result is base64 encoded; images the provider only
    /// returned by URL are downloaded and encoded.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call, or a transport
    /// error, or [`GenerateError::NoImagesReturned`] for an empty result.
    pub async fn generate(
        &self,
        options: &GenerationOptions,
    ) -> Result<Vec<String>, GenerateError> {
        let resolved = options.resolved();
        resolved.validate()?;
        debug!(
            "Generating {} image(s): model={} size={} quality={}",
            resolved.num_images, resolved.model, resolved.size, resolved.quality
        );

        let request = build_request(&resolved);
        if let Some(log) = &self.log {
            if let Err(e) = log.record_request(&request) {
                warn!("Failed to log request: {e}");
            }
        }

        let result = self.api.create_image(&request).await;

        if let Some(log) = &self.log {
            if let Err(e) = log.record_response(&result) {
                warn!("Failed to log response: {e}");
            }
        }

        let response = result?;

        let mut images = Vec::with_capacity(response.data.len());
        for entry in response.data {
            if let Some(b64) = entry.b64_json.filter(|b| !b.is_empty()) {
                images.push(b64);
            } else if let Some(url) = entry.url.filter(|u| !u.is_empty()) {
                let bytes = self.api.download(&url).await?;
                images.push(base64::engine::general_purpose::STANDARD.encode(bytes));
            }
        }

        if images.is_empty() {
            return Err(GenerateError::NoImagesReturned);
        }
        Ok(images)
    }
}
