//! just-icon - interactive AI icon generator.

mod adapters;
mod cli;
mod client;
mod commands;
mod context;
mod error;
mod i18n;
mod interactive;
mod output;
mod params;
mod ports;
mod request_log;
mod settings;
mod ui;
mod validation;

use std::io;
use std::process;

use clap::Parser;
use log::{debug, warn, LevelFilter};

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::i18n::{Language, Localizer};
use crate::interactive::{Outcome, TermPrompter, Workflow};
use crate::settings::{discover_settings_path, SettingsStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tokio::spawn(async {
        exit_signal().await;
        let _ = console::Term::stdout().show_cursor();
        println!();
        process::exit(0);
    });

    ui::banner();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    pretty_env_logger::formatted_builder().filter_level(level).parse_default_env().init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn exit_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let store = SettingsStore::new(discover_settings_path(cli.settings_path.as_deref()));
    debug!("Settings file: {}", store.path().display());
    let mut ctx = ServiceContext::live(store, Localizer::default());

    match cli.command {
        Some(Command::Config(args)) => commands::run_config(&mut ctx, &args),
        Some(Command::Reset { force }) => {
            commands::run_reset(&mut ctx, force, &mut io::stdin().lock())?;
            Ok(())
        }
        None => {
            let language = cli.language.as_deref().and_then(|code| {
                let language = Language::from_code(code);
                if language.is_none() {
                    warn!("Ignoring unknown language '{code}'");
                }
                language
            });

            let mut workflow =
                Workflow::new(&mut ctx, TermPrompter::stdout()).with_language(language);
            // a quit leaves without a word
            if workflow.run().await? == Outcome::Finished {
                println!("{}", ctx.localizer.t("interactive_goodbye"));
            }
            Ok(())
        }
    }
}
