//! Output formatting for the CLI.

use bundle_analytics::DispatchOutcome;
use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!(r#"{{"error": "{}"}}"#, msg.replace('"', "\\\""));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Status badge for dispatch outcomes.
pub fn outcome_badge(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Delivered => style("delivered").green().to_string(),
        DispatchOutcome::Disabled => style("disabled").dim().to_string(),
        DispatchOutcome::Unavailable => style("unavailable").yellow().to_string(),
        DispatchOutcome::Skipped => style("skipped").dim().to_string(),
        DispatchOutcome::Failed(e) => style(format!("failed: {}", e)).red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_badge_mentions_error() {
        let badge = outcome_badge(&DispatchOutcome::Failed("boom".to_string()));
        assert!(badge.contains("failed: boom"));
    }

    #[test]
    fn test_outcome_badge_skipped() {
        let badge = outcome_badge(&DispatchOutcome::Skipped);
        assert!(badge.contains("skipped"));
    }
}
