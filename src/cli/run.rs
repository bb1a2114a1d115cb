//! Handler for the `run` and `once` commands.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::{bootstrap, CycleOutcome};
use crate::cli::{Cli, RunArgs};
use crate::config::Config;
use crate::error::Result;

/// Load configuration with CLI overrides applied, then start logging.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config)?;

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    Ok(config)
}

/// Execute the run command. With `once`, a single cycle is run and its
/// failure, if any, is returned.
pub async fn execute(cli: &Cli, args: &RunArgs, once: bool) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.dry_run {
        config.scheduler.dry_run = true;
    }
    if config.scheduler.dry_run {
        info!("Dry-run mode enabled - will not submit transactions");
    }

    info!(
        chain_id = config.network.chain_id,
        pair = %format!("{}/{}", config.pair.one, config.pair.two),
        "seesaw starting"
    );

    let mut scheduler = bootstrap::build_scheduler(&config).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            on_signal.cancel();
        }
    });

    if once {
        let report = scheduler.run_cycle(&cancel).await;
        if let CycleOutcome::Failed { error, .. } = report.outcome {
            return Err(error);
        }
    } else {
        scheduler.run(cancel).await;
    }

    info!("seesaw stopped");
    Ok(())
}
