use crate::{
    commands::{Cli, Commands, RunArgs},
    conn::ConnectionParams,
    error::CliError,
    shutdown::ShutdownCoordinator,
};
use clap::Parser;
use contract::ContractLoader;
use engine_core::{SledStateStore, StateStore};
use runtime::{Processor, ProcessorConfig};
use std::{process, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;

mod commands;
mod conn;
mod env;
mod error;
mod output;
mod shutdown;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Commands::Run(args) => {
            let _log_guard = init_logging(args.log_level.into(), args.run_dir.as_deref());
            match run(args).await {
                Ok(all_failed) if all_failed => 3,
                Ok(_) => 0,
                Err(CliError::ShutdownRequested) => {
                    info!("run interrupted by shutdown request; progress has been saved");
                    1
                }
                Err(e @ (CliError::ContractLoad(_) | CliError::ContractFileRead(_))) => {
                    tracing::error!("fatal configuration error: {e}");
                    2
                }
                Err(e) => {
                    tracing::error!("run failed: {e}");
                    1
                }
            }
        }
        Commands::Progress {
            session_id,
            partition_rem,
            json,
        } => {
            tracing_subscriber::fmt().with_max_level(Level::WARN).init();
            match show_progress(session_id, *partition_rem, *json).await {
                Ok(()) => 0,
                Err(e) => {
                    tracing::error!("{e}");
                    1
                }
            }
        }
    };

    process::exit(exit_code);
}

/// Initializes the process-wide tracing subscriber once: stdout at the
/// requested level, plus (if `run_dir` is given) a non-blocking per-run log
/// file. The returned guard must be held for the process lifetime or the
/// file writer is dropped before it flushes.
fn init_logging(level: Level, run_dir: Option<&str>) -> Option<WorkerGuard> {
    let subscriber = tracing_subscriber::fmt().with_max_level(level);

    match run_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok();
            let file_appender = tracing_appender::rolling::never(dir, "stratum.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            subscriber.with_writer(non_blocking).with_ansi(false).init();
            Some(guard)
        }
        None => {
            subscriber.init();
            None
        }
    }
}

/// Runs one migration pass. Returns `Ok(true)` when every application in
/// the run failed, so the caller can map that to exit code 3.
async fn run(args: &RunArgs) -> Result<bool, CliError> {
    crate::env::EnvManager::load_all(&args.env_file)?;

    let raw_contract = std::fs::read_to_string(&args.contract)?;
    let contract = Arc::new(ContractLoader::load(&raw_contract)?);

    let conn_str = ConnectionParams {
        server: args.server.clone(),
        database: args.database.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        connect_timeout_secs: args.connect_timeout_secs,
    }
    .to_conn_string();

    let cancel_token = CancellationToken::new();
    ShutdownCoordinator::new(cancel_token.clone()).register_handlers();

    let config = ProcessorConfig {
        session_id: args.session_id.clone(),
        batch_size: args.batch_size,
        worker_count: args.workers,
        limit: args.limit,
        app_id_start: args.app_id_start,
        app_id_end: args.app_id_end,
        partition_mod: args.instance_count,
        partition_rem: args.instance_id,
        exclude_failed: !args.retry_failed,
    };

    let mut processor = Processor::new(conn_str, contract, config, cancel_token.clone());
    if let Some(dir) = &args.state_dir {
        let store = SledStateStore::open(dir)?;
        processor = processor.with_state_store(Arc::new(store) as Arc<dyn StateStore>);
    }

    let summary = processor.run().await?;
    output::print_summary_table(&summary);
    let summary_path = args.run_dir.as_ref().map(|dir| format!("{dir}/run-summary.json"));
    output::write_summary(&summary, summary_path.as_deref())?;

    if cancel_token.is_cancelled() {
        return Err(CliError::ShutdownRequested);
    }

    let all_failed = summary.applications_succeeded == 0 && summary.applications_failed > 0;
    Ok(all_failed)
}

async fn show_progress(session_id: &str, partition_rem: u32, as_json: bool) -> Result<(), CliError> {
    let state_dir = dirs::home_dir()
        .ok_or_else(|| CliError::Unexpected("could not determine home directory".into()))?
        .join(".stratum/state");
    let store = SledStateStore::open(&state_dir)?;

    let checkpoint = store.load_checkpoint(session_id, partition_rem).await?;

    match checkpoint {
        Some(cp) if as_json => {
            let json = serde_json::to_string_pretty(&cp).map_err(CliError::JsonSerialize)?;
            println!("{json}");
        }
        Some(cp) => {
            println!("Checkpoint for session '{session_id}' / partition {partition_rem}:");
            println!("-----------------------------");
            println!("{:<16} {:?}", "Stage", cp.stage);
            println!("{:<16} {}", "Last app_id", cp.last_app_id);
            println!("{:<16} {}", "Updated at", cp.updated_at.to_rfc3339());
        }
        None => println!("no checkpoint recorded for session '{session_id}' / partition {partition_rem}"),
    }

    Ok(())
}
