mod cli;
mod error;

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use valuta::{CancellationToken, ConsoleReporter, FailurePolicy, Valuta};
use valuta_cbr::{CbrFetcher, CbrParser};

use crate::cli::{Cli, seconds};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let fetcher = CbrFetcher::new(&cli.api_url)
        .map_err(|e| CliError::Config(e.to_string()))?
        .request_timeout(seconds(cli.request_timeout_secs));
    let fetcher_url = fetcher.base_url().clone();
    let policy = if cli.lenient {
        FailurePolicy::SkipDay
    } else {
        FailurePolicy::FailFast
    };

    let mut builder = Valuta::builder()
        .fetcher(Arc::new(fetcher))
        .parser(Arc::new(CbrParser::new()))
        .reporter(Arc::new(ConsoleReporter::new(cli.format.into())))
        .max_in_flight(cli.workers)
        .failure_policy(policy);
    builder = match seconds(cli.timeout_secs) {
        Some(deadline) => builder.deadline(deadline),
        None => builder.no_deadline(),
    };
    let valuta = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    tracing::debug!(days = cli.days, %as_of, url = %fetcher_url, "starting run");

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; cancelling");
                cancel.cancel();
            }
        })
    };

    let outcome = valuta
        .run_with_cancellation(cli.days, as_of, &cancel)
        .await;
    interrupt.abort();
    outcome?;
    Ok(())
}
