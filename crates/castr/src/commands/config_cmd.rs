//! `castr config`: inspect configuration.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(castr_config::config_path);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let mut cfg = castr_config::load_config(Some(path.as_path()))?;
            if cfg.account.secret.is_some() {
                cfg.account.secret = Some("<redacted>".into());
            }
            output::print_output(&castr_config::to_toml(&cfg)?, global.quiet);
            Ok(())
        }
    }
}
