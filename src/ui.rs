//! Terminal status lines
//!
//! Markers stay in plain text so the output reads the same when piped; color
//! is layered on only when stdout is a terminal.

use colored::{Colorize, control};
use std::io::IsTerminal;

/// Decide whether to emit ANSI color and apply the decision globally
pub fn init_color(no_color: bool) -> bool {
    let enabled =
        !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
    control::set_override(enabled);
    enabled
}

/// Stage banner
pub fn heading(title: &str) {
    println!();
    println!("{}", format!("== {} ==", title).bold().cyan());
}

/// A step is about to run
pub fn start(description: &str) {
    println!("{} {}", "[ .. ]".blue(), description);
}

/// A step finished with exit status 0
pub fn success(description: &str) {
    println!("{} {}", "[ OK ]".green().bold(), description);
}

/// A step failed; goes to stderr
pub fn failure(description: &str, code: Option<i32>) {
    let status = match code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status".to_string(),
    };
    eprintln!("{} {} ({})", "[FAIL]".red().bold(), description, status);
}

/// Something was skipped or degraded; goes to stderr
pub fn warning(message: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), message);
}

/// Indented informational line
pub fn detail(label: &str, value: &str) {
    println!("  {:<12} {}", format!("{}:", label).bold(), value);
}
