//! `castr enable-stream` / `castr enable-platform`.

use owo_colors::OwoColorize;

use castr_core::{Command as CoreCommand, CommandResult, EnableMode, SyncService};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn stream(
    service: SyncService,
    stream: String,
    mode: EnableMode,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = service
        .execute(CoreCommand::EnableStream { stream, mode })
        .await?;
    report(&result, global)
}

pub async fn platform(
    service: SyncService,
    reference: String,
    mode: EnableMode,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = service
        .execute(CoreCommand::EnablePlatform {
            platform: reference.clone(),
            mode,
        })
        .await?;

    if matches!(&result, CommandResult::Platforms { outcomes, .. } if outcomes.is_empty()) {
        return Err(CliError::NotFound {
            resource_type: "platform".into(),
            identifier: reference,
        });
    }
    report(&result, global)
}

fn report(result: &CommandResult, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let state = |enabled: bool| {
        let label = if enabled { "enabled" } else { "disabled" };
        if !color {
            label.to_owned()
        } else if enabled {
            label.green().to_string()
        } else {
            label.red().to_string()
        }
    };

    match result {
        CommandResult::Stream { stream_id, enabled } => {
            output::print_output(&format!("stream {stream_id} {}", state(*enabled)), global.quiet);
            Ok(())
        }
        CommandResult::Platforms {
            stream_id,
            outcomes,
        } => {
            let lines: Vec<String> = outcomes
                .iter()
                .map(|o| match &o.result {
                    Ok(()) => format!("stream {stream_id} platform {} {}", o.platform_id, state(o.enabled)),
                    Err(e) => format!("stream {stream_id} platform {} failed: {e}", o.platform_id),
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);

            match result.failed() {
                0 => Ok(()),
                failed => Err(CliError::PartialFailure {
                    failed,
                    total: outcomes.len(),
                }),
            }
        }
    }
}
