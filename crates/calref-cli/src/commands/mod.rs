//! CLI command implementations.

pub mod inspect;
pub mod pcorr;
pub mod trace;

use colored::Colorize;

use calref::{Diagnostic, Severity};

/// Print diagnostics the way operators expect to see them.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        let label = match d.severity {
            Severity::Warning => d.severity.label().yellow().bold(),
            Severity::Info => d.severity.label().blue(),
        };
        match d.row {
            Some(row) => println!("{}  {} (row {})", label, d.message, row),
            None => println!("{}  {}", label, d.message),
        }
    }
}
