//! Error types for just-icon.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("Settings file {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file exists but is not valid JSON.
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Prompt is empty after trimming.
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    /// Prompt equals the placeholder hint.
    #[error("prompt is the example placeholder")]
    PlaceholderPrompt,

    /// API key is empty after trimming.
    #[error("API key cannot be empty")]
    EmptyKey,
}

/// Errors from the image generation client.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Model is not in the supported set.
    #[error("Unsupported model '{model}'. Supported models: {supported:?}")]
    UnsupportedModel {
        /// Requested model.
        model: String,
        /// Supported models.
        supported: &'static [&'static str],
    },

    /// Size is not valid for the model.
    #[error("Invalid size '{size}' for model {model}. Valid sizes: {valid:?}")]
    UnsupportedSize {
        /// Requested size.
        size: String,
        /// Resolved model.
        model: String,
        /// Sizes the model accepts.
        valid: &'static [&'static str],
    },

    /// Quality is not valid for the model.
    #[error("Invalid quality '{quality}' for model {model}. Valid qualities: {valid:?}")]
    UnsupportedQuality {
        /// Requested quality.
        quality: String,
        /// Resolved model.
        model: String,
        /// Qualities the model accepts.
        valid: &'static [&'static str],
    },

    /// Image count outside 1..=10.
    #[error("Number of images must be between 1 and 10, got {0}")]
    InvalidCount(u32),

    /// The generation request failed in transport or returned a non-success status.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// An image returned by URL could not be fetched.
    #[error("Failed to download image from {url}: {message}")]
    DownloadFailed {
        /// Image URL.
        url: String,
        /// Cause.
        message: String,
    },

    /// The provider answered without any usable image.
    #[error("No images generated")]
    NoImagesReturned,
}

/// Errors while persisting a generated image.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The image payload is not valid base64.
    #[error("Failed to decode image data: {0}")]
    DecodeFailed(#[from] base64::DecodeError),

    /// The image could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Why a generate-and-save batch produced nothing.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Every image of the batch failed to save.
    #[error("No images were saved successfully")]
    NothingSaved,

    /// The background generation task panicked.
    #[error("Generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Top-level error that terminates the process with exit code 1.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings store failure.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Invalid argument on the command line.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Terminal or filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
