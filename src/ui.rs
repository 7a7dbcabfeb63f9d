//! Styled terminal output: status lines, banner, and the progress spinner.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::{JoinError, JoinHandle};

const SPINNER_INTERVAL: Duration = Duration::from_millis(90);

const BANNER: &[&str] = &[
    r"     _           _     _",
    r"    (_)_   _ ___| |_  (_) ___ ___  _ __",
    r"    | | | | / __| __| | |/ __/ _ \| '_ \",
    r"    | | |_| \__ \ |_  | | (_| (_) | | | |",
    r"   _/ |\__,_|___/\__| |_|\___\___/|_| |_|",
    r"  |__/",
];

/// Print the startup banner.
pub fn banner() {
    println!();
    for line in BANNER {
        println!("{}", line.bright_blue().bold());
    }
    println!("{}", "      AI-powered icon generator".cyan());
    println!();
}

/// Print a success line.
pub fn success(message: &str) {
    println!("{} {message}", "✔".green());
}

/// Print an error line.
pub fn error(message: &str) {
    println!("{} {message}", "✘".red());
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!("{} {message}", "⚠".yellow());
}

/// Print a hint line.
pub fn hint(message: &str) {
    println!("{} {message}", "›".blue());
}

/// Print a bold section header.
pub fn sub_header(message: &str) {
    println!("\n{}", message.bright_green().bold());
}

/// Print `key: value`.
pub fn key_value(key: &str, value: &str) {
    println!("{} {value}", format!("{key}:").bold());
}

/// Print dimmed text.
pub fn dim(message: &str) {
    println!("{}", message.dimmed());
}

/// Mask an API key for display, keeping only the last four characters.
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("sk-...{tail}")
}

/// Show a spinner on stderr until `task` finishes, then return its output.
///
/// When stderr is not a terminal the message is printed once instead.
///
/// # Errors
///
/// Returns the join error if the task panicked.
pub async fn spin_until<T>(message: &str, task: JoinHandle<T>) -> Result<T, JoinError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    if spinner.is_hidden() {
        eprintln!("{message}");
    }
    spinner.enable_steady_tick(SPINNER_INTERVAL);

    let result = task.await;
    spinner.finish_and_clear();
    result
}
