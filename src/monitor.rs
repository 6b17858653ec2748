//! Progress and error reporting for the terminal.

use std::io::Write;

use colored::Colorize;

use crate::error::CountError;

/// Receives start/end-of-phase notifications, per-item progress marks, and
/// error notifications while counters run. Write-only from the counters'
/// perspective; never affects counting logic.
pub trait ActivityMonitor: Send + Sync {
    /// A counting phase is starting.
    fn start_action(&self, label: &str);

    /// The current phase finished with the given formatted result.
    fn end_action(&self, result: &str);

    /// A small progress fragment, e.g. one dot per region visited.
    fn message(&self, fragment: &str);

    /// A non-fatal error scoped to one resource or region.
    fn sub_resource_error(&self, message: &str);

    /// Report an error if one occurred; returns whether it did. Callers use
    /// this at fatal-to-run boundaries and abort on `true`.
    fn check_error(&self, err: Option<&CountError>) -> bool;
}

/// Colored stdout/stderr reporter used by the CLI.
pub struct TerminalMonitor;

impl ActivityMonitor for TerminalMonitor {
    fn start_action(&self, label: &str) {
        print!("{} ", format!("{label}...").bold());
        let _ = std::io::stdout().flush();
    }

    fn end_action(&self, result: &str) {
        println!("{}", result.green());
    }

    fn message(&self, fragment: &str) {
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }

    fn sub_resource_error(&self, message: &str) {
        eprintln!("  {} {}", "*".red().bold(), message.red());
    }

    fn check_error(&self, err: Option<&CountError>) -> bool {
        match err {
            Some(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                true
            }
            None => false,
        }
    }
}
