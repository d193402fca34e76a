// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use worker_pool_core::{FastrandRandom, PoolConfig, PoolConfigFile, TokioTimer};
use worker_pool_task_pipes::{PipeChannelFactory, PipeCoordinator};

/// Distribute N simulated tasks over a fixed pool of three workers
#[derive(Debug, Parser)]
#[command(name = "worker-pool", version)]
struct CliArgs {
    /// Total number of tasks to distribute
    num_tasks: Option<u64>,

    /// Maximum simulated delay per task, in seconds
    max_delay_secs: Option<u64>,

    /// JSON file with num_tasks and max_delay_secs, read only when given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("worker_pool_core=debug,worker_pool=debug,warn")
        } else {
            EnvFilter::new("worker_pool_core=info,worker_pool=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> Result<PoolConfig> {
    let file = match &args.config {
        Some(path) => PoolConfigFile::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => PoolConfigFile::default(),
    };

    let overrides = PoolConfigFile {
        num_tasks: args.num_tasks,
        max_delay_secs: args.max_delay_secs,
    };

    PoolConfig::try_from(file.merge(overrides)).context("Invalid configuration")
}

fn run(args: CliArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(&args)?;
    if config.num_workers() > config.num_tasks() {
        warn!(
            workers = config.num_workers(),
            tasks = config.num_tasks(),
            "more workers than tasks, some workers will stay unused"
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let coordinator = PipeCoordinator::new(
        config,
        PipeChannelFactory,
        Arc::new(TokioTimer),
        Arc::new(FastrandRandom),
    );
    let report = runtime
        .block_on(coordinator.run())
        .context("Worker pool aborted")?;

    info!(elapsed_secs = start_time.elapsed().as_secs_f64(), "pool finished");
    println!("{}", report);
    Ok(())
}
