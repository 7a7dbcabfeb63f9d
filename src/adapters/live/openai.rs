//! Live adapter for `OpenAI`-compatible image generation endpoints.

use log::debug;
use reqwest::{Client, StatusCode};

use crate::error::GenerateError;
use crate::ports::{ApiFuture, ImageApi, ProviderRequest, ProviderResponse};

const GENERATIONS_PATH: &str = "/v1/images/generations";

/// Calls `{base_url}/v1/images/generations` with bearer authentication.
pub struct OpenAiImageApi {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiImageApi {
    /// Create an adapter for the given key and endpoint root.
    #[must_use]
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of the generations endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{GENERATIONS_PATH}", self.base_url)
    }
}

impl ImageApi for OpenAiImageApi {
    fn create_image(&self, request: &ProviderRequest) -> ApiFuture<'_, ProviderResponse> {
        let request = request.clone();
        Box::pin(async move {
            let endpoint = self.endpoint();
            debug!("POST {endpoint} (n={}, size={})", request.n, request.size);

            let response = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| GenerateError::RequestFailed(e.to_string()))?;

            let status = response.status();
            let body =
                response.text().await.map_err(|e| GenerateError::RequestFailed(e.to_string()))?;

            if !status.is_success() {
                return Err(GenerateError::RequestFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    truncate(&body, 500)
                )));
            }

            serde_json::from_str(&body).map_err(|e| {
                GenerateError::RequestFailed(format!("Failed to parse response: {e}"))
            })
        })
    }

    fn download(&self, url: &str) -> ApiFuture<'_, Vec<u8>> {
        let url = url.to_string();
        Box::pin(async move {
            debug!("GET {url}");
            let failed =
                |message: String| GenerateError::DownloadFailed { url: url.clone(), message };

            let response = self.client.get(&url).send().await.map_err(|e| failed(e.to_string()))?;
            if response.status() != StatusCode::OK {
                return Err(failed(format!("HTTP {}", response.status().as_u16())));
            }
            let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
            Ok(bytes.to_vec())
        })
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
