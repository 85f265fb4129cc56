//! Clap derive structures for the `castr` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use castr_core::EnableMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// castr -- keep a Castr account in sync and flip streams on and off
#[derive(Debug, Parser)]
#[command(
    name = "castr",
    version,
    about = "Synchronize and control Castr live streams",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, env = "CASTR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Poll interval in seconds, 0 to disable (overrides the config file)
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Requested state for the enable commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    On,
    Off,
    Toggle,
}

impl From<ModeArg> for EnableMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::On => Self::On,
            ModeArg::Off => Self::Off,
            ModeArg::Toggle => Self::Toggle,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Keep polling and print every change until Ctrl-C
    Watch,

    /// List streams and their platforms
    #[command(alias = "ls")]
    Streams,

    /// Turn a stream on or off (by id or name)
    EnableStream {
        /// Stream id or name
        stream: String,
        mode: ModeArg,
    },

    /// Turn platforms on or off, e.g. "My Show :: YouTube" or "My Show :: *ALL*"
    EnablePlatform {
        /// Compound "{stream} :: {platform}" reference
        reference: String,
        mode: ModeArg,
    },

    /// Inspect the configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Print the effective configuration (secrets redacted)
    Show,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_enable_platform() {
        let cli = Cli::try_parse_from([
            "castr",
            "--interval",
            "0",
            "enable-platform",
            "Show :: *ALL*",
            "toggle",
        ])
        .unwrap();
        assert_eq!(cli.global.interval, Some(0));
        match cli.command {
            Command::EnablePlatform { reference, mode } => {
                assert_eq!(reference, "Show :: *ALL*");
                assert_eq!(EnableMode::from(mode), EnableMode::Toggle);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["castr", "enable-stream", "s1", "maybe"]).is_err());
    }
}
