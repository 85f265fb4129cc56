//! Console host surface: prints what the sync service publishes.

use std::io::{self, Write};

use chrono::Local;
use owo_colors::OwoColorize;

use castr_core::{ChoiceSet, ConnectionStatus, HostSurface, StatusReport, VariableView};

/// Writes every published view and status change to stdout.
pub struct ConsoleHost {
    color: bool,
    quiet: bool,
}

impl ConsoleHost {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    fn emit(&self, line: &str) {
        if self.quiet {
            return;
        }
        let stamp = Local::now().format("%H:%M:%S");
        let mut stdout = io::stdout().lock();
        if self.color {
            let _ = writeln!(stdout, "{} {line}", stamp.dimmed());
        } else {
            let _ = writeln!(stdout, "{stamp} {line}");
        }
    }

    fn paint_status(&self, status: ConnectionStatus) -> String {
        let label = status.to_string();
        if !self.color {
            return label;
        }
        match status {
            ConnectionStatus::Ok => label.green().to_string(),
            ConnectionStatus::Connecting | ConnectionStatus::Unknown => label.yellow().to_string(),
            ConnectionStatus::AuthenticationFailure
            | ConnectionStatus::ConnectionFailure
            | ConnectionStatus::UnknownError => label.red().bold().to_string(),
        }
    }
}

impl HostSurface for ConsoleHost {
    fn publish_variables(&self, view: &VariableView) {
        self.emit(&format!("variables updated ({} keys)", view.len()));
        for (key, variable) in view.iter() {
            self.emit(&format!("  {key} = {}", variable.value));
        }
    }

    fn publish_action_choices(&self, choices: &ChoiceSet) {
        self.emit(&format!(
            "action choices: {} streams, {} platform references",
            choices.streams.len(),
            choices.platforms.len()
        ));
    }

    fn publish_feedback_choices(&self, choices: &ChoiceSet) {
        self.emit(&format!(
            "feedback choices: {} streams, {} platform references",
            choices.streams.len(),
            choices.platforms.len()
        ));
    }

    fn update_status(&self, status: &StatusReport) {
        let painted = self.paint_status(status.status);
        match &status.message {
            Some(message) => self.emit(&format!("status {painted}: {message}")),
            None => self.emit(&format!("status {painted}")),
        }
    }
}
