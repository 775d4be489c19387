use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FetchOutcome, HttpResultsBackend, PollVoteController, VoteControls, VoteOutcome,
};
use shared::domain::VoteOption;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod ui;
mod watch;

use config::load_settings;
use ui::render::{render_counts, render_status};

#[derive(Parser, Debug)]
#[command(name = "vote-terminal", about = "Live results and voting for the three-option poll")]
struct Cli {
    /// Absolute origin of the voting API, e.g. http://localhost:8000
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll results and vote interactively (default).
    Watch,
    /// Fetch and print the current results once.
    Results,
    /// Cast one vote, then print the refreshed results.
    Vote { option: VoteOption },
    /// Check that the API answers.
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config);
    if let Some(base_url) = cli.base_url {
        settings.api_base_url = base_url;
    }
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        settings.poll_interval_ms = poll_interval_ms;
    }
    settings.validate()?;
    info!(base_url = %settings.api_base_url, "using voting API");

    let backend = Arc::new(HttpResultsBackend::new(
        &settings.api_base_url,
        settings.request_timeout(),
    )?);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            let controller =
                PollVoteController::with_poll_interval(backend, settings.poll_interval());
            watch::run_watch(controller, VoteControls::default()).await?;
        }
        Command::Results => {
            let controller = PollVoteController::new(backend);
            let outcome = controller.fetch_results().await;
            let view = controller.view();
            if outcome == FetchOutcome::Failed {
                let description = view
                    .status
                    .error_description()
                    .unwrap_or("failed to fetch results");
                bail!("{description}");
            }
            println!("{}", render_counts(&view));
        }
        Command::Vote { option } => {
            let controller = PollVoteController::new(backend);
            let outcome = controller.cast_vote(option).await;
            let view = controller.view();
            println!("{}", render_status(&view));
            if outcome != VoteOutcome::Submitted {
                bail!("vote for {option} was not recorded");
            }
            println!("{}", render_counts(&view));
        }
        Command::Ping => {
            let banner = backend.api_banner().await?;
            println!("{}: {}", backend.base_url(), banner.message);
        }
    }

    Ok(())
}
