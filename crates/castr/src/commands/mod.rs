//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod config_cmd;
pub mod enable;
pub mod streams;
pub mod watch;

use std::sync::Arc;

use castr_core::{NullHost, SyncConfig, SyncService};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an account-bound command to its handler.
pub async fn dispatch(cmd: Command, config: SyncConfig, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Watch => watch::handle(config, global).await,
        Command::Streams => oneshot(config, |svc| streams::handle(svc, global)).await,
        Command::EnableStream { stream, mode } => {
            oneshot(config, |svc| enable::stream(svc, stream, mode.into(), global)).await
        }
        Command::EnablePlatform { reference, mode } => {
            oneshot(config, |svc| enable::platform(svc, reference, mode.into(), global)).await
        }
        // Config is handled before dispatch
        Command::Config(_) => unreachable!(),
    }
}

/// One-shot: poll once, run closure, shut down.
///
/// The timer is disabled since only a single request-response cycle is
/// needed; the directory must be loaded before references can resolve.
pub async fn oneshot<F, Fut, T>(config: SyncConfig, f: F) -> Result<T, CliError>
where
    F: FnOnce(SyncService) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let mut cfg = config;
    cfg.poll_interval_secs = 0;

    let service = SyncService::new(cfg, Arc::new(NullHost))?;
    service.poll().await?;
    let result = f(service.clone()).await;
    service.shutdown().await;
    result
}
