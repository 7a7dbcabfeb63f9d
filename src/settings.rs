//! Persisted settings record and the store that owns its file.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::params::defaults;

/// Settings file name inside the home directory.
pub const SETTINGS_FILE_NAME: &str = "just-icon.json";

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "JUST_ICON_CONFIG";

/// The single persisted configuration record.
///
/// Empty strings mean "not configured"; the `*_or_default` accessors
/// resolve them to their documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential for the image API.
    #[serde(rename = "openai_api_key", default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Provider endpoint root.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    /// Directory for saved images.
    #[serde(rename = "default_output_path", default, skip_serializing_if = "String::is_empty")]
    pub output_path: String,
    /// UI language code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// Whether the setup wizard has completed.
    #[serde(default)]
    pub initialized: bool,
}

/// Partial update of the settings record; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    /// New API key.
    pub api_key: Option<String>,
    /// New base URL.
    pub base_url: Option<String>,
    /// New output directory.
    pub output_path: Option<String>,
    /// New language code.
    pub language: Option<String>,
    /// New initialized flag.
    pub initialized: Option<bool>,
}

impl Settings {
    /// Merge a partial update into this record.
    pub fn apply(&mut self, update: SettingsUpdate) {
        let SettingsUpdate { api_key, base_url, output_path, language, initialized } = update;
        if let Some(v) = api_key {
            self.api_key = v;
        }
        if let Some(v) = base_url {
            self.base_url = v;
        }
        if let Some(v) = output_path {
            self.output_path = v;
        }
        if let Some(v) = language {
            self.language = v;
        }
        if let Some(v) = initialized {
            self.initialized = v;
        }
    }

    /// Base URL, falling back to the built-in provider endpoint.
    #[must_use]
    pub fn base_url_or_default(&self) -> &str {
        non_empty_or(&self.base_url, defaults::BASE_URL)
    }

    /// Output directory, falling back to `./output`.
    #[must_use]
    pub fn output_path_or_default(&self) -> &str {
        non_empty_or(&self.output_path, defaults::OUTPUT_PATH)
    }

    /// Language code, falling back to `en`.
    #[must_use]
    pub fn language_or_default(&self) -> &str {
        non_empty_or(&self.language, defaults::LANGUAGE)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Reads and writes the settings file. The only code that touches it.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file yields the default record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn get(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => return Err(SettingsError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&contents)
            .map_err(|source| SettingsError::Parse { path: self.path.clone(), source })
    }

    /// Write the whole record, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io { path: self.path.clone(), source };
        let data = serde_json::to_vec_pretty(settings)
            .map_err(|e| io_error(std::io::Error::other(e)))?;
        self.write_atomic(&data).map_err(io_error)
    }

    /// Read, merge the present fields of `update`, and write back.
    ///
    /// # Errors
    ///
    /// Returns an error if the current record cannot be loaded or the result cannot be written.
    pub fn update(&self, update: SettingsUpdate) -> Result<(), SettingsError> {
        let mut settings = self.get()?;
        settings.apply(update);
        self.set(&settings)
    }

    /// Remove the file and write a fresh default record with `initialized = false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the old file cannot be removed or the new one cannot be written.
    pub fn reset(&self) -> Result<(), SettingsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(SettingsError::Io { path: self.path.clone(), source }),
        }
        self.update(SettingsUpdate {
            base_url: Some(defaults::BASE_URL.to_string()),
            output_path: Some(defaults::OUTPUT_PATH.to_string()),
            language: Some(defaults::LANGUAGE.to_string()),
            initialized: Some(false),
            ..SettingsUpdate::default()
        })
    }

    /// Whether the setup wizard has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be loaded.
    pub fn is_initialized(&self) -> Result<bool, SettingsError> {
        Ok(self.get()?.initialized)
    }

    fn write_atomic(&self, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = owner_only_file(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)
    }
}

#[cfg(unix)]
fn owner_only_file(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn owner_only_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::File::create(path)
}

/// Resolve `path` against the current directory, dropping `.` components.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let cleaned: PathBuf =
        path.components().filter(|c| !matches!(c, Component::CurDir)).collect();
    if cleaned.is_absolute() {
        Ok(cleaned)
    } else {
        Ok(std::env::current_dir()?.join(cleaned))
    }
}

/// Discover the settings path using the resolution order:
/// 1. Explicit path
/// 2. `JUST_ICON_CONFIG` environment variable
/// 3. `~/just-icon.json`
#[must_use]
pub fn discover_settings_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    if let Some(p) = std::env::var_os(SETTINGS_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }

    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(SETTINGS_FILE_NAME)
}
