//! The `config` and `reset` subcommands.

use std::io::{BufRead, Write};
use std::path::Path;

use colored::Colorize;
use log::debug;

use crate::cli::ConfigArgs;
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::i18n::Language;
use crate::settings::{absolute_path, SettingsUpdate};
use crate::ui;
use crate::validation::validate_api_key;

/// Apply the given settings changes, then print the settings if asked to
/// or if nothing was changed.
///
/// Every value is validated before anything is written.
///
/// # Errors
///
/// Returns [`AppError::InvalidArgument`] for a blank API key or an unknown
/// language, and a settings error if the file cannot be read or written.
pub fn run_config(ctx: &mut ServiceContext, args: &ConfigArgs) -> Result<(), AppError> {
    ctx.apply_stored_language()?;

    let api_key = args.api_key.as_deref().map(str::trim);
    if let Some(key) = api_key {
        validate_api_key(key).map_err(|e| {
            AppError::InvalidArgument(ctx.localizer.tf("config_invalid_api_key", &[&e]))
        })?;
    }
    let language = match args.language.as_deref() {
        Some(code) => Some(Language::from_code(code).ok_or_else(|| {
            AppError::InvalidArgument(ctx.localizer.tf("config_invalid_language", &[&code]))
        })?),
        None => None,
    };
    let output_path = match args.output_path.as_deref().map(str::trim) {
        Some(path) => Some(absolute_path(Path::new(path))?.to_string_lossy().into_owned()),
        None => None,
    };
    let base_url = args.base_url.as_deref().map(str::trim).map(str::to_string);

    let update = SettingsUpdate {
        api_key: api_key.map(str::to_string),
        base_url: base_url.clone(),
        output_path: output_path.clone(),
        language: language.map(|l| l.code().to_string()),
        initialized: None,
    };
    if update != SettingsUpdate::default() {
        debug!("Updating settings at {}", ctx.store.path().display());
        ctx.store.update(update)?;
    }

    if let Some(language) = language {
        ctx.localizer.set_language(language);
    }
    let loc = &ctx.localizer;
    if let Some(key) = api_key {
        ui::success(&loc.tf("config_api_key_success", &[&ui::mask_api_key(key)]));
    }
    if let Some(url) = &base_url {
        ui::success(&loc.tf("config_base_url_success", &[url]));
    }
    if let Some(path) = &output_path {
        ui::success(&loc.tf("config_output_path_success", &[path]));
    }
    if let Some(language) = language {
        ui::success(&loc.tf("config_language_success", &[&language.code()]));
    }

    if args.show || !args.has_changes() {
        show_config(ctx)?;
    } else if api_key.is_some() {
        println!();
        ui::dim(loc.t("common_built_with"));
    }
    Ok(())
}

fn show_config(ctx: &ServiceContext) -> Result<(), AppError> {
    let settings = ctx.store.get()?;
    let loc = &ctx.localizer;

    ui::sub_header(loc.t("config_current_title"));
    println!();

    if settings.api_key.is_empty() {
        ui::key_value(loc.t("config_api_key"), &loc.t("config_not_configured").red().to_string());
        println!("   {}", loc.t("config_get_api_key").dimmed());
        println!("   {}", loc.t("config_set_api_key").dimmed());
    } else {
        let masked = ui::mask_api_key(&settings.api_key);
        ui::key_value(loc.t("config_api_key"), &masked.green().to_string());
    }
    ui::key_value(loc.t("config_base_url"), &settings.base_url_or_default().blue().to_string());
    ui::key_value(
        loc.t("config_default_output"),
        &settings.output_path_or_default().blue().to_string(),
    );
    ui::key_value(loc.t("config_language"), &settings.language_or_default().cyan().to_string());
    let file = ctx.store.path().display().to_string();
    ui::key_value(loc.t("config_file"), &file.dimmed().to_string());

    println!();
    ui::dim(loc.t("common_built_with"));
    Ok(())
}

/// Reset the settings to defaults, asking for confirmation on `input`
/// unless `force` is set.
///
/// Returns whether the reset happened.
///
/// # Errors
///
/// Returns an error if the confirmation cannot be read or the settings
/// cannot be rewritten.
pub fn run_reset(
    ctx: &mut ServiceContext,
    force: bool,
    input: &mut dyn BufRead,
) -> Result<bool, AppError> {
    // a corrupt file must still be resettable
    if let Err(e) = ctx.apply_stored_language() {
        debug!("Keeping default language: {e}");
    }
    let loc = &ctx.localizer;

    if !force {
        println!("{} {}", "⚠".yellow(), loc.t("reset_warning"));
        print!("{} (y/N): ", loc.t("reset_confirm"));
        std::io::stdout().flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !is_confirmation(&answer) {
            println!("{}", loc.t("reset_cancelled"));
            return Ok(false);
        }
    }

    ctx.store.reset()?;
    ui::success(loc.t("reset_success"));
    println!("{}", loc.t("reset_next_run"));
    Ok(true)
}

fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}
