//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Generate app icons from a text description, interactively.
#[derive(Parser, Debug)]
#[command(name = "just-icon", version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Interface language for this session: en or zh.
    pub language: Option<String>,

    /// Settings file path override.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub settings_path: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands. Without one, the interactive generator starts.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show or change settings.
    Config(ConfigArgs),

    /// Reset settings to their defaults.
    Reset {
        /// Skip the confirmation question.
        #[arg(short, long)]
        force: bool,
    },
}

/// Options of `just-icon config`.
#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// API key for the image provider.
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// API base URL.
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Directory for generated icons.
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Interface language: en or zh.
    #[arg(short, long)]
    pub language: Option<String>,

    /// Print the current settings.
    #[arg(short, long)]
    pub show: bool,
}

impl ConfigArgs {
    /// Whether any setting is being changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.api_key.is_some()
            || self.base_url.is_some()
            || self.output_path.is_some()
            || self.language.is_some()
    }
}
