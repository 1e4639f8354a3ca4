#![doc = include_str!("../README.md")]

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::config::{CliArgs, CliConfig};
use cli::input::collect_ids;
use cli::progress::TerminalProgress;
use cli::telemetry::{self, init_telemetry};
use reaper::{
    CancellationToken, DeleteSummary, Deleter, Error, FailurePolicy, LocalBackend, StdPrinter,
};
use serde::Serialize;
use std::{
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    let providers = init_telemetry(config.output)?;
    let result = run(&config).await;
    providers.shutdown();
    result
}

async fn run(config: &CliConfig) -> anyhow::Result<ExitCode> {
    let ids = collect_ids(config).await?;
    let backend = LocalBackend::open(&config.repo)
        .await
        .with_context(|| format!("unable to open repository at {}", config.repo.display()))?;

    let cancel = CancellationToken::new();
    let deleter = Deleter::new(Arc::new(backend))
        .with_config(config.delete.clone())
        .with_printer(Arc::new(StdPrinter::new(config.output)))
        .with_progress(Arc::new(TerminalProgress::new(
            config.output.shows_progress(),
        )))
        .with_cancellation(cancel.clone());

    log_startup_info(config, ids.len());

    let watcher = tokio::spawn(shutdown_signal(cancel.clone(), config.timeout));

    let started = Instant::now();
    let (summary, err) = deleter.run(&ids, config.file_type, config.policy).await;
    let elapsed = started.elapsed();
    watcher.abort();

    telemetry::increment_removals_attempted(summary.attempted);
    telemetry::increment_removals_failed(summary.failed);
    telemetry::record_deletion_duration(elapsed.as_secs_f64() * 1000.0);

    tracing::info!(
        "Deletion of {} {} files finished in {:?}",
        summary.total,
        summary.file_type,
        elapsed
    );

    report(config, &summary, err.as_ref())?;

    Ok(ExitCode::from(exit_code(&summary, err.as_ref())))
}

/// Non-zero when a checked run failed or any run was cancelled. Failed
/// removals in a best-effort run are only warnings.
fn exit_code(summary: &DeleteSummary, err: Option<&Error>) -> u8 {
    if err.is_some() || summary.cancelled {
        1
    } else {
        0
    }
}

fn log_startup_info(config: &CliConfig, count: usize) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting deletion with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Deleting {} {} files from {} with {} workers",
            count,
            config.file_type,
            config.repo.display(),
            config.delete.num_workers
        );
    }
}

/// Machine-readable outcome printed with `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    summary: &'a DeleteSummary,
    error: Option<String>,
}

fn report(config: &CliConfig, summary: &DeleteSummary, err: Option<&Error>) -> anyhow::Result<()> {
    let err = err.map(Error::to_string);

    if config.output.json {
        let report = JsonReport {
            summary,
            error: err,
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    // Best-effort runs only surface errors through the log.
    if let Some(err) = &err {
        if config.policy == FailurePolicy::FailFast {
            eprintln!("Error: {err}");
        } else {
            tracing::warn!("{err}");
        }
    }

    if !config.output.quiet {
        println!("{summary}");
    }
    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken, timeout: Option<Duration>) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let deadline = async {
        match timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
        () = deadline => tracing::warn!("Timeout of {:?} elapsed", timeout.unwrap_or_default()),
    }

    tracing::info!("Cancelling deletion, waiting for in-flight removals...");
    cancel.cancel();
}
