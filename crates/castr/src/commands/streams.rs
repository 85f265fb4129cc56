//! `castr streams`: list streams and their platforms.

use std::sync::Arc;

use tabled::Tabled;

use castr_core::{Stream, SyncService};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StreamRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Platforms")]
    platforms: String,
}

impl From<&Arc<Stream>> for StreamRow {
    fn from(s: &Arc<Stream>) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            enabled: if s.enabled { "yes" } else { "no" }.into(),
            status: s.broadcasting_status.clone().unwrap_or_default(),
            platforms: s
                .platforms
                .iter()
                .map(|p| format!("{}{}", p.name, if p.enabled { "" } else { " (off)" }))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(service: SyncService, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = service.snapshot();
    let out = output::render_list(
        &global.output,
        snapshot.streams(),
        |s| StreamRow::from(s),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) && !global.quiet {
        let references: Vec<&str> = snapshot.reference_strings().collect();
        if !references.is_empty() {
            let listing = format!("\nPlatform references:\n  {}", references.join("\n  "));
            output::print_output(&listing, false);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castr_core::Platform;

    #[test]
    fn row_marks_disabled_platforms() {
        let stream = Arc::new(Stream {
            id: "s1".into(),
            name: "Main".into(),
            enabled: true,
            broadcasting_status: Some("online".into()),
            ingest_server: String::new(),
            ingest_key: String::new(),
            platforms: vec![
                Platform {
                    id: "p1".into(),
                    name: "yt".into(),
                    enabled: true,
                    broadcasting_status: None,
                },
                Platform {
                    id: "p2".into(),
                    name: "fb".into(),
                    enabled: false,
                    broadcasting_status: None,
                },
            ],
        });

        let row = StreamRow::from(&stream);
        assert_eq!(row.enabled, "yes");
        assert_eq!(row.status, "online");
        assert_eq!(row.platforms, "yt, fb (off)");
    }
}
