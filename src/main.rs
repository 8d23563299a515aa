// ABOUTME: Main entry point for the mailserver-aliases command line tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailserver_aliases::app::{App, ConsoleRenderer, MailserverService};
use mailserver_aliases::config::AppConfig;
use mailserver_aliases::docker::MailserverExec;
use mailserver_aliases::models::AliasResponse;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "mailserver-aliases", version, about = "Manage email aliases of a docker-mailserver container")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether the mailserver container is running
    Status,
    /// List mailboxes
    Emails,
    /// List aliases
    Aliases,
    /// Add an alias forwarding to an existing mailbox
    Add { alias: String, email: String },
    /// Delete an alias
    Delete { alias: String },
    /// Keep polling the mailserver status and report changes
    Watch {
        /// Seconds between status checks
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging()?;
    setup_panic_handler();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let app = App::new(config, ConsoleRenderer);
    let Some(service) = app.connect().await else {
        return Ok(ExitCode::FAILURE);
    };

    if run_command(&app, &service, cli.command).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_command<E: MailserverExec>(
    app: &App<ConsoleRenderer>,
    service: &MailserverService<E>,
    command: Command,
) -> Result<bool> {
    let notifier = &app.notifier;

    match command {
        Command::Status => {
            let Some(status) = notifier.report(service.status().await) else {
                return Ok(false);
            };
            notifier.status(&status);
            print_json(&status)?;
        }
        Command::Emails => {
            let Some(emails) = notifier.report(service.emails().await) else {
                return Ok(false);
            };
            print_json(&emails)?;
        }
        Command::Aliases => {
            let Some(aliases) = notifier.report(service.aliases().await) else {
                return Ok(false);
            };
            print_json(&aliases)?;
        }
        Command::Add { alias, email } => {
            let request = AliasResponse::new(alias, email);
            let Some(created) = notifier.report(service.add_alias(request).await) else {
                return Ok(false);
            };
            notifier.alias_created(&created);
            print_json(&created)?;
        }
        Command::Delete { alias } => {
            let Some(deleted) = notifier.report(service.delete_alias(&alias).await) else {
                return Ok(false);
            };
            notifier.alias_deleted(&deleted.alias);
        }
        Command::Watch { interval } => {
            let interval = Duration::from_secs(interval.max(1));
            app.watch(service, interval, tokio::signal::ctrl_c()).await;
        }
    }

    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_logging() -> Result<()> {
    use std::fs::{self, OpenOptions};
    use tracing_subscriber::prelude::*;

    // Create log directory if it doesn't exist
    let log_dir = dirs::home_dir()
        .map(|home| home.join(".mailserver-aliases").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".mailserver-aliases/logs"));
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "mailserver-aliases-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailserver_aliases=info".into()),
        )
        .init();

    Ok(())
}

fn setup_panic_handler() {
    use tracing::error;

    // Also runs for subscriber and renderer panics that the store and the
    // toast board catch; those are not fatal
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("Panic: {}", panic_info);
        default_hook(panic_info);
    }));
}
