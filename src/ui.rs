//! Console status output
//!
//! Status lines go to stderr so stdout stays clean for command output
//! (`resources`, `version`). Styling follows the terminal: `console`
//! drops colors when stderr is not a tty.

use console::Style;

/// A top-level packaging step
pub fn step(message: &str) {
    eprintln!("{}", Style::new().bold().apply_to(message));
}

/// Indented detail under the current step
pub fn note(message: &str) {
    eprintln!("   {message}");
}

pub fn warn(message: &str) {
    eprintln!(
        "{} {}",
        Style::new().yellow().bold().apply_to("⚠️  WARNING:"),
        message
    );
}

pub fn error(message: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("❌"), message);
}

pub fn success(message: &str) {
    eprintln!("{} {}", Style::new().green().bold().apply_to("✓"), message);
}
