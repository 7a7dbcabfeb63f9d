//! Image API port: the provider's image-generation and download endpoints.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Body of an image-generation request, in provider literals.
///
/// Carries no credential; adapters attach authentication themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// Final prompt text sent to the provider.
    pub prompt: String,
    /// Number of images.
    pub n: u32,
    /// Pixel size.
    pub size: String,
    /// Quality literal.
    pub quality: String,
    /// Background literal.
    pub background: String,
    /// Output format literal.
    pub output_format: String,
    /// Moderation literal.
    pub moderation: String,
}

/// One entry of a provider response. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderImage {
    /// Hosted image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Inline base64 image data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    /// Prompt as rewritten by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Provider response to an image-generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: Option<i64>,
    /// Returned images.
    #[serde(default)]
    pub data: Vec<ProviderImage>,
}

/// Boxed future type returned by [`ImageApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GenerateError>> + Send + 'a>>;

/// Talks to a remote image-generation service.
pub trait ImageApi: Send + Sync {
    /// Submit a generation request.
    fn create_image(&self, request: &ProviderRequest) -> ApiFuture<'_, ProviderResponse>;

    /// Fetch the raw bytes of an image returned by URL.
    fn download(&self, url: &str) -> ApiFuture<'_, Vec<u8>>;
}
