//! Colored terminal output
//!
//! Uses owo-colors for terminal colors.

use owo_colors::OwoColorize;

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Print a variable in list output
/// Example: "HOME=/root"
pub fn list_item(name: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("{}{}", name.green(), format!("={value}").dimmed()),
        None => println!("{}", name),
    }
}
