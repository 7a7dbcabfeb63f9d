//! Sanitized JSON snapshots of outbound requests and inbound responses.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{json, Value};

use crate::error::GenerateError;
use crate::ports::{ProviderRequest, ProviderResponse};

/// Environment variable naming the log directory; logging is off when unset.
pub const REQUEST_LOG_ENV: &str = "JUST_ICON_REQUEST_LOG";

const DEFAULT_LOG_DIR: &str = "logs";

/// Writes one JSON file per request and one per response into a directory.
#[derive(Debug, Clone)]
pub struct RequestLog {
    dir: PathBuf,
}

impl RequestLog {
    /// Log into the given directory, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build a log from `JUST_ICON_REQUEST_LOG`, if set.
    ///
    /// `1` or `true` selects `./logs`; any other value is the directory itself.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var_os(REQUEST_LOG_ENV).filter(|v| !v.is_empty()).map(|v| Self::new(log_dir(&v)))
    }

    /// Directory the log writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record the outbound request.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    pub fn record_request(&self, request: &ProviderRequest) -> std::io::Result<PathBuf> {
        // ProviderRequest carries no credential, so it is logged as-is.
        let value = serde_json::to_value(request).map_err(std::io::Error::other)?;
        self.write("request", &value)
    }

    /// Record the response or the error that replaced it.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    pub fn record_response(
        &self,
        result: &Result<ProviderResponse, GenerateError>,
    ) -> std::io::Result<PathBuf> {
        self.write("response", &summarize_response(result))
    }

    fn write(&self, kind: &str, value: &Value) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S_%3f");
        let path = self.dir.join(format!("{kind}_{timestamp}.json"));
        let data = serde_json::to_vec_pretty(value).map_err(std::io::Error::other)?;
        std::fs::write(&path, data)?;
        Ok(path)
    }
}

fn log_dir(value: &OsStr) -> PathBuf {
    match value.to_str() {
        Some("1" | "true") => PathBuf::from(DEFAULT_LOG_DIR),
        _ => PathBuf::from(value),
    }
}

/// Response snapshot without image payloads; base64 data is reduced to its length.
fn summarize_response(result: &Result<ProviderResponse, GenerateError>) -> Value {
    match result {
        Err(e) => json!({ "success": false, "error": e.to_string() }),
        Ok(response) => {
            let data: Vec<Value> = response
                .data
                .iter()
                .enumerate()
                .map(|(index, image)| {
                    let mut info = json!({
                        "index": index,
                        "has_b64_json": image.b64_json.is_some(),
                        "has_url": image.url.is_some(),
                    });
                    if let Some(b64) = &image.b64_json {
                        info["b64_json_length"] = json!(b64.len());
                    }
                    if let Some(url) = &image.url {
                        info["url"] = json!(url);
                    }
                    info
                })
                .collect();
            json!({
                "success": true,
                "created": response.created,
                "data_count": response.data.len(),
                "data": data,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_api::ProviderImage;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "gpt-image-1".into(),
            prompt: "a cat".into(),
            n: 1,
            size: "1024x1024".into(),
            quality: "low".into(),
            background: "auto".into(),
            output_format: "png".into(),
            moderation: "auto".into(),
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn env_value_selects_directory() {
        assert_eq!(log_dir(OsStr::new("1")), PathBuf::from("logs"));
        assert_eq!(log_dir(OsStr::new("true")), PathBuf::from("logs"));
        assert_eq!(log_dir(OsStr::new("/var/tmp/icons")), PathBuf::from("/var/tmp/icons"));
    }

    #[test]
    fn writes_request_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path().join("logs"));

        let path = log.record_request(&request()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("request_"));
        assert!(name.ends_with(".json"));

        let value = read_json(&path);
        assert_eq!(value["prompt"], "a cat");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn response_snapshot_omits_image_data() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path());
        let response = ProviderResponse {
            created: Some(42),
            data: vec![
                ProviderImage { b64_json: Some("aGVsbG8=".into()), ..ProviderImage::default() },
                ProviderImage {
                    url: Some("https://cdn.test/x.png".into()),
                    ..ProviderImage::default()
                },
            ],
        };

        let path = log.record_response(&Ok(response)).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("aGVsbG8="));

        let value = read_json(&path);
        assert_eq!(value["success"], true);
        assert_eq!(value["data_count"], 2);
        assert_eq!(value["data"][0]["b64_json_length"], 8);
        assert_eq!(value["data"][1]["url"], "https://cdn.test/x.png");
    }

    #[test]
    fn error_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path());
        let path = log
            .record_response(&Err(GenerateError::RequestFailed("API error (401): bad key".into())))
            .unwrap();

        let value = read_json(&path);
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("401"));
    }
}
