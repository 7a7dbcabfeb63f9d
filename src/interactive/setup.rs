//! First-run setup wizard.

use std::path::Path;

use colored::Colorize;

use super::{Halt, Prompter, Workflow};
use crate::i18n::Language;
use crate::params::defaults;
use crate::settings::{absolute_path, SettingsUpdate};
use crate::ui;
use crate::validation::validate_api_key;

const LANGUAGE_CHOICES: &[(&str, Language)] =
    &[("English", Language::English), ("中文", Language::Chinese)];

impl<P: Prompter> Workflow<'_, P> {
    /// Collect language, base URL, API key, and output directory, then mark
    /// the settings initialized.
    ///
    /// Each answer is persisted as soon as it is given. A quit at any step
    /// abandons the wizard with `initialized` still false.
    pub(super) fn setup_wizard(&mut self) -> Result<(), Halt> {
        println!();
        println!("{}", "Welcome to Just Icon!".bright_cyan().bold());
        println!();

        self.fill_default_settings()?;
        self.setup_language()?;

        println!();
        println!("{}", self.ctx.localizer.t("interactive_setup_continue"));
        println!();

        self.setup_base_url()?;
        self.setup_api_key()?;
        self.setup_output_directory()?;

        println!();
        ui::success(self.ctx.localizer.t("interactive_setup_complete"));
        println!();
        Ok(())
    }

    /// Give empty fields their defaults so the file is complete from the first step.
    fn fill_default_settings(&mut self) -> Result<(), Halt> {
        let current = self.ctx.store.get()?;
        let missing = |value: &str, default: &str| value.is_empty().then(|| default.to_string());
        self.ctx.store.update(SettingsUpdate {
            language: missing(&current.language, defaults::LANGUAGE),
            base_url: missing(&current.base_url, defaults::BASE_URL),
            output_path: missing(&current.output_path, defaults::OUTPUT_PATH),
            ..SettingsUpdate::default()
        })?;
        Ok(())
    }

    fn setup_language(&mut self) -> Result<(), Halt> {
        let items: Vec<&str> = LANGUAGE_CHOICES.iter().map(|(label, _)| *label).collect();
        let index = self.prompter.select("Select language / 选择语言", &items)?;
        let language = LANGUAGE_CHOICES.get(index).map_or(Language::English, |(_, lang)| *lang);

        self.ctx
            .store
            .update(SettingsUpdate {
                language: Some(language.code().to_string()),
                ..Default::default()
            })?;
        self.ctx.localizer.set_language(language);
        // an explicit choice here wins over the command-line language
        self.language_override = Some(language);
        Ok(())
    }

    fn setup_base_url(&mut self) -> Result<(), Halt> {
        let current = self.ctx.store.get()?;
        let answer = self
            .prompter
            .input(
                self.ctx.localizer.t("interactive_base_url_prompt"),
                current.base_url_or_default(),
            )?;
        let base_url = match answer.trim() {
            "" => defaults::BASE_URL.to_string(),
            url => url.to_string(),
        };
        self.ctx.store.update(SettingsUpdate { base_url: Some(base_url), ..Default::default() })?;
        Ok(())
    }

    fn setup_api_key(&mut self) -> Result<(), Halt> {
        ui::dim(self.ctx.localizer.t("interactive_api_key_help"));
        loop {
            let answer = self.prompter.secret(self.ctx.localizer.t("interactive_api_key_prompt"))?;
            let api_key = answer.trim();
            if let Err(e) = validate_api_key(api_key) {
                ui::error(&e.to_string());
                continue;
            }
            self.ctx
                .store
                .update(SettingsUpdate {
                    api_key: Some(api_key.to_string()),
                    ..Default::default()
                })?;
            return Ok(());
        }
    }

    fn setup_output_directory(&mut self) -> Result<(), Halt> {
        let answer = self
            .prompter
            .input(self.ctx.localizer.t("interactive_output_dir_prompt"), defaults::OUTPUT_PATH)?;
        let answer = match answer.trim() {
            "" => defaults::OUTPUT_PATH,
            path => path,
        };

        let path = absolute_path(Path::new(answer)).map_err(|e| Halt::Fatal(e.into()))?;
        self.ctx.store.update(SettingsUpdate {
            output_path: Some(path.to_string_lossy().into_owned()),
            initialized: Some(true),
            ..Default::default()
        })?;
        Ok(())
    }
}
