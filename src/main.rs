mod commands;
mod render;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use guestsync_core::GuestSyncError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "guestsync")]
#[command(about = "Add your assistants as guests on events booked through a scheduling link")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add missing target emails to scheduler-booked events (default)
    Sync {
        /// Days before now to scan (overrides DAYS_BACK)
        #[arg(long)]
        days_back: Option<u32>,

        /// Days after now to scan (overrides DAYS_FORWARD)
        #[arg(long)]
        days_forward: Option<u32>,
    },
    /// List the calendars visible to the configured credentials
    Calendars,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "guestsync=info,guestsync_core=info,guestsync_google=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<GuestSyncError>() {
        Some(GuestSyncError::Auth(_)) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env is fine, the variables may come from the environment
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Sync {
            days_back,
            days_forward,
        }) => commands::sync::run(days_back, days_forward).await,
        None => commands::sync::run(None, None).await,
        Some(Commands::Calendars) => commands::calendars::run().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            exit_code(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config = anyhow::Error::new(GuestSyncError::Config("PRIMARY_EMAIL".into()));
        let auth = anyhow::Error::new(GuestSyncError::Auth("expired".into()));
        let plumbing = anyhow::anyhow!("something else");

        assert_eq!(exit_code(&config), ExitCode::from(1));
        assert_eq!(exit_code(&auth), ExitCode::from(2));
        assert_eq!(exit_code(&plumbing), ExitCode::from(1));
    }

    #[test]
    fn test_sync_is_the_default_command() {
        let cli = Cli::try_parse_from(["guestsync"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["guestsync", "sync", "--days-back", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sync {
                days_back: Some(3),
                days_forward: None
            })
        ));
    }
}
