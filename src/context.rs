//! Service context passed explicitly to the workflow and commands.

use std::sync::Arc;

use log::debug;

use crate::adapters::live::openai::OpenAiImageApi;
use crate::client::IconClient;
use crate::error::SettingsError;
use crate::i18n::{Language, Localizer};
use crate::ports::ImageApi;
use crate::request_log::RequestLog;
use crate::settings::{Settings, SettingsStore};

/// Builds an image API for the current settings.
pub type ApiFactory = Arc<dyn Fn(&Settings) -> Box<dyn ImageApi> + Send + Sync>;

/// Settings store, active localizer, and the way to reach the image API.
pub struct ServiceContext {
    /// Owner of the settings file.
    pub store: SettingsStore,
    /// Active translations.
    pub localizer: Localizer,
    api_factory: ApiFactory,
    request_log: Option<RequestLog>,
}

impl ServiceContext {
    /// Create a live context talking to the configured provider.
    ///
    /// Request logging is enabled when `JUST_ICON_REQUEST_LOG` is set.
    #[must_use]
    pub fn live(store: SettingsStore, localizer: Localizer) -> Self {
        let factory: ApiFactory = Arc::new(|settings: &Settings| {
            Box::new(OpenAiImageApi::new(settings.api_key.clone(), settings.base_url_or_default()))
                as Box<dyn ImageApi>
        });
        let mut ctx = Self::with_api(store, localizer, factory);
        ctx.request_log = RequestLog::from_env();
        if let Some(log) = &ctx.request_log {
            debug!("Logging API traffic to {}", log.dir().display());
        }
        ctx
    }

    /// Create a context with a custom API factory.
    #[must_use]
    pub fn with_api(store: SettingsStore, localizer: Localizer, api_factory: ApiFactory) -> Self {
        Self { store, localizer, api_factory, request_log: None }
    }

    /// Client for one generation call, bound to `settings`.
    #[must_use]
    pub fn client(&self, settings: &Settings) -> IconClient {
        IconClient::new((self.api_factory)(settings), self.request_log.clone())
    }

    /// Apply the stored language to the localizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub fn apply_stored_language(&mut self) -> Result<(), SettingsError> {
        let settings = self.store.get()?;
        self.localizer.set_language(Language::from_setting(settings.language_or_default()));
        Ok(())
    }
}
