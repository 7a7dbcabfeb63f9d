//! Localized user-facing strings.

use std::collections::HashMap;
use std::fmt::Display;

use log::warn;

const EN_MESSAGES: &str = include_str!("../locales/en.json");
const ZH_MESSAGES: &str = include_str!("../locales/zh.json");

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    /// English (`en`).
    #[default]
    English,
    /// Simplified Chinese (`zh`).
    Chinese,
}

impl Language {
    /// Parse a language code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "en" => Some(Self::English),
            "zh" => Some(Self::Chinese),
            _ => None,
        }
    }

    /// Parse a stored code, treating anything unknown as English.
    #[must_use]
    pub fn from_setting(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// Language code as persisted in settings.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Chinese => "zh",
        }
    }
}

/// Message lookup for the active language, with English and then the key as fallbacks.
#[derive(Debug, Clone)]
pub struct Localizer {
    language: Language,
    english: HashMap<String, String>,
    chinese: HashMap<String, String>,
}

impl Localizer {
    /// Create a localizer with the embedded message tables.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            english: parse_table("en", EN_MESSAGES),
            chinese: parse_table("zh", ZH_MESSAGES),
        }
    }

    /// Active language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the active language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translate `key`.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        let table = match self.language {
            Language::English => &self.english,
            Language::Chinese => &self.chinese,
        };
        table.get(key).or_else(|| self.english.get(key)).map_or(key, String::as_str)
    }

    /// Translate `key` and substitute each `{}` with the next argument.
    #[must_use]
    pub fn tf(&self, key: &str, args: &[&dyn Display]) -> String {
        let template = self.t(key);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

fn parse_table(code: &str, raw: &str) -> HashMap<String, String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Failed to parse {code} messages: {e}");
        HashMap::new()
    })
}
