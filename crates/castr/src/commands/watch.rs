//! `castr watch`: run the sync service until Ctrl-C.

use std::sync::Arc;

use tracing::{info, warn};

use castr_core::{SyncConfig, SyncService};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::ConsoleHost;
use crate::output;

pub async fn handle(config: SyncConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let host = Arc::new(ConsoleHost::new(
        output::should_color(&global.color),
        global.quiet,
    ));
    let service = SyncService::new(config, host)?;

    // The timer keeps retrying, so a failed first poll is not fatal.
    if let Err(e) = service.start().await {
        warn!(error = %e, "initial poll failed");
    }

    tokio::signal::ctrl_c().await?;
    info!("interrupted, shutting down");
    service.shutdown().await;
    Ok(())
}
