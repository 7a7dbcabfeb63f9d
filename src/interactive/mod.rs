//! Interactive icon generation: first-run setup, then the prompt loop.

pub mod prompt;
mod setup;

use std::path::{Path, PathBuf};

use colored::Colorize;
use log::debug;

use crate::context::ServiceContext;
use crate::error::{AppError, BatchError, SettingsError, ValidationError};
use crate::i18n::Language;
use crate::output::{generate_file_name, save_image};
use crate::params::{
    defaults, format_extension, GenerationOptions, MODEL_GPT_IMAGE_1, QUALITY_AUTO, QUALITY_HIGH,
    QUALITY_LOW, QUALITY_MEDIUM,
};
use crate::settings::Settings;
use crate::ui;
use crate::validation::{validate_prompt, PROMPT_PLACEHOLDER};

pub use prompt::{PromptError, Prompter, TermPrompter};

/// How a workflow run ended. None of these is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user declined to continue.
    Finished,
    /// The user cancelled at a prompt.
    Quit,
    /// API key or output path missing; guidance was printed.
    NotConfigured,
}

/// Result of one generate-and-save batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files written, in response order.
    pub saved: Vec<PathBuf>,
    /// Directory the files were written to.
    pub output_dir: PathBuf,
}

/// Unwinds the workflow: a user quit, or an error that ends the process.
#[derive(Debug)]
enum Halt {
    Quit,
    Fatal(AppError),
}

impl From<PromptError> for Halt {
    fn from(e: PromptError) -> Self {
        match e {
            PromptError::Quit => Self::Quit,
            PromptError::Io(e) => Self::Fatal(AppError::Io(e)),
        }
    }
}

impl From<SettingsError> for Halt {
    fn from(e: SettingsError) -> Self {
        Self::Fatal(e.into())
    }
}

/// Drives the interactive session against a [`ServiceContext`].
pub struct Workflow<'a, P: Prompter> {
    ctx: &'a mut ServiceContext,
    prompter: P,
    language_override: Option<Language>,
}

impl<'a, P: Prompter> Workflow<'a, P> {
    /// Create a workflow reading input from `prompter`.
    pub fn new(ctx: &'a mut ServiceContext, prompter: P) -> Self {
        Self { ctx, prompter, language_override: None }
    }

    /// Use `language` for this session instead of the stored one.
    #[must_use]
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language_override = language;
        self
    }

    /// Run until the user quits or declines to continue.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that should end the process,
    /// such as an unreadable settings file or terminal.
    pub async fn run(&mut self) -> Result<Outcome, AppError> {
        match self.drive().await {
            Ok(outcome) => Ok(outcome),
            Err(Halt::Quit) => Ok(Outcome::Quit),
            Err(Halt::Fatal(e)) => Err(e),
        }
    }

    /// Whether the setup wizard still has to run.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub fn is_first_run(&self) -> Result<bool, SettingsError> {
        Ok(!self.ctx.store.is_initialized()?)
    }

    async fn drive(&mut self) -> Result<Outcome, Halt> {
        self.apply_language()?;

        if self.is_first_run()? {
            self.setup_wizard()?;
            self.apply_language()?;
        }

        if !self.check_prerequisites()? {
            return Ok(Outcome::NotConfigured);
        }

        loop {
            let prompt = self.get_prompt()?;
            let quantity = self.get_quantity()?;
            let quality = self.get_quality()?;

            let settings = self.ctx.store.get()?;
            let output_dir = PathBuf::from(settings.output_path_or_default());
            let options = GenerationOptions {
                prompt,
                model: MODEL_GPT_IMAGE_1.to_string(),
                size: defaults::SIZE.to_string(),
                quality: quality.to_string(),
                background: defaults::BACKGROUND.to_string(),
                output_format: defaults::OUTPUT_FORMAT.to_string(),
                moderation: defaults::MODERATION.to_string(),
                num_images: quantity,
                raw_prompt: false,
            };

            match self.generate_batch(&settings, options, &output_dir).await {
                Ok(summary) => {
                    println!();
                    println!(
                        "{}",
                        self.ctx.localizer.tf(
                            "icon_generation_summary",
                            &[
                                &summary.saved.len().to_string().green(),
                                &summary.output_dir.display().to_string().blue(),
                            ],
                        )
                    );
                    println!();
                }
                Err(e) => {
                    ui::error(&self.ctx.localizer.tf("interactive_generation_failed", &[&e]));
                    continue;
                }
            }

            if !self.ask_continue() {
                return Ok(Outcome::Finished);
            }
        }
    }

    fn apply_language(&mut self) -> Result<(), SettingsError> {
        self.ctx.apply_stored_language()?;
        if let Some(language) = self.language_override {
            self.ctx.localizer.set_language(language);
        }
        debug!("Session language: {}", self.ctx.localizer.language().code());
        Ok(())
    }

    fn check_prerequisites(&self) -> Result<bool, SettingsError> {
        let settings = self.ctx.store.get()?;
        let loc = &self.ctx.localizer;

        if settings.api_key.trim().is_empty() {
            ui::error(loc.t("interactive_api_key_required"));
            let hint = loc.t("interactive_api_key_set_hint");
            ui::hint(&format!("{hint}: just-icon config --api-key YOUR_KEY"));
            return Ok(false);
        }
        if settings.output_path.trim().is_empty() {
            ui::error(loc.t("interactive_output_dir_required"));
            ui::hint(&format!(
                "{}: just-icon config --output-path YOUR_PATH",
                loc.t("interactive_output_dir_set_hint")
            ));
            return Ok(false);
        }
        Ok(true)
    }

    fn get_prompt(&mut self) -> Result<String, PromptError> {
        let example = self.ctx.localizer.t("interactive_prompt_example");
        let message = format!(
            "{} {}",
            self.ctx.localizer.t("interactive_prompt_input"),
            format!("({example} {PROMPT_PLACEHOLDER})").dimmed()
        );
        loop {
            let text = self.prompter.input(&message, "")?;
            match validate_prompt(&text) {
                Ok(()) => return Ok(text.trim().to_string()),
                Err(ValidationError::PlaceholderPrompt) => {
                    ui::error(self.ctx.localizer.t("validation_prompt_placeholder"));
                }
                Err(_) => ui::error(self.ctx.localizer.t("validation_prompt_empty")),
            }
        }
    }

    fn get_quantity(&mut self) -> Result<u32, PromptError> {
        let text = self.prompter.input(self.ctx.localizer.t("interactive_quantity_prompt"), "1")?;
        Ok(parse_quantity(&text))
    }

    fn get_quality(&mut self) -> Result<&'static str, PromptError> {
        let loc = &self.ctx.localizer;
        let items = [
            loc.t("interactive_quality_auto"),
            loc.t("interactive_quality_high"),
            loc.t("interactive_quality_medium"),
            loc.t("interactive_quality_low"),
        ];
        let index = self.prompter.select(loc.t("interactive_quality_prompt"), &items)?;
        Ok(quality_for_choice(index))
    }

    fn ask_continue(&mut self) -> bool {
        let loc = &self.ctx.localizer;
        let items = [loc.t("interactive_yes"), loc.t("interactive_no")];
        matches!(self.prompter.select(loc.t("interactive_another"), &items), Ok(0))
    }

    /// Generate images for `options` and save them under `output_dir`.
    async fn generate_batch(
        &self,
        settings: &Settings,
        options: GenerationOptions,
        output_dir: &Path,
    ) -> Result<BatchSummary, BatchError> {
        let loc = &self.ctx.localizer;

        println!();
        println!("{} {}", loc.t("prompt_label"), options.prompt.bold());
        println!("{} {}", loc.t("model_label"), options.model.blue());
        println!("{} {}", loc.t("size_label"), options.size.cyan());
        println!("{} {}", loc.t("quality_label"), options.quality.cyan());
        println!("{} {}", loc.t("quantity_label"), options.num_images.to_string().cyan());
        println!();

        let client = self.ctx.client(settings);
        let format = options.output_format.clone();
        let task = tokio::spawn(async move { client.generate(&options).await });

        let images = match ui::spin_until(loc.t("interactive_generating_spinner"), task).await? {
            Ok(images) => {
                ui::success(loc.t("interactive_generating_success"));
                images
            }
            Err(e) => {
                ui::error(loc.t("interactive_generating_failed"));
                return Err(e.into());
            }
        };

        std::fs::create_dir_all(output_dir)
            .map_err(|source| BatchError::OutputDir { path: output_dir.to_path_buf(), source })?;

        let saved = self.save_batch(&images, output_dir, format_extension(&format));
        if saved.is_empty() {
            return Err(BatchError::NothingSaved);
        }
        Ok(BatchSummary { saved, output_dir: output_dir.to_path_buf() })
    }

    /// Save each image under a fresh name, retrying once with another name.
    fn save_batch(&self, images: &[String], dir: &Path, extension: &str) -> Vec<PathBuf> {
        let loc = &self.ctx.localizer;
        let mut saved = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let path = dir.join(generate_file_name(extension));
            match save_image(image, &path) {
                Ok(()) => {
                    ui::success(&loc.tf("interactive_saved", &[&path.display()]));
                    saved.push(path);
                }
                Err(first) => {
                    debug!("Saving image {} to {} failed: {first}", i + 1, path.display());
                    let retry = dir.join(generate_file_name(extension));
                    if save_image(image, &retry).is_ok() {
                        ui::warning(
                            &loc.tf("interactive_saved_retry", &[&(i + 1), &retry.display()]),
                        );
                        saved.push(retry);
                    } else {
                        ui::warning(&loc.tf("interactive_save_failed", &[&(i + 1), &first]));
                    }
                }
            }
        }
        saved
    }
}

/// Parse the quantity answer; anything but a positive integer means 1.
fn parse_quantity(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => defaults::NUM_IMAGES,
    }
}

/// Map a quality menu index to its value.
fn quality_for_choice(index: usize) -> &'static str {
    match index {
        1 => QUALITY_HIGH,
        2 => QUALITY_MEDIUM,
        3 => QUALITY_LOW,
        _ => QUALITY_AUTO,
    }
}

#[cfg(test)]
mod tests;
