//! Pretty-printing messages to the console

use colored::Colorize;

use crate::diagnostics::Diagnostic;

/// Pretty-print an error message to the console
pub fn error(error_message: String) {
    let error_title = "error:".red().bold();
    eprintln!("{} {}", error_title, error_message);
}

/// Pretty-print a warning message to the console
pub fn warning(message: String, line_number: usize) {
    let warning = "warning:".yellow().bold();
    eprintln!("{} line {}: {}", warning, line_number, message);
}

/// Pretty-print one accumulated diagnostic, reusing its `Display` for the
/// `Error in file <f> at line <n>: <message>` wording.
pub fn diagnostic(diagnostic: &Diagnostic) {
    error(diagnostic.to_string());
}
