//! Operator-facing status lines.

use colored::Colorize;

use postsync_core::Reporter;

/// Prints reporter lines to the terminal: info on stdout, warnings and
/// errors on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }
}
