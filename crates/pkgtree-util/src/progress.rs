use std::io::Write;

use console::Style;

/// Colour of the label column of a status line.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    /// Something was changed (green).
    Action,
    /// Read-only information (cyan).
    Info,
    /// Something needs attention (yellow).
    Warn,
    /// Nothing was changed because of `--dry-run` (magenta).
    DryRun,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new().bold();
        match self {
            Tone::Action => style.green(),
            Tone::Info => style.cyan(),
            Tone::Warn => style.yellow(),
            Tone::DryRun => style.magenta(),
        }
    }
}

/// Print a right-aligned status line to stderr: `   Equalized 12 packages`
pub fn status_with(tone: Tone, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        tone.style().apply_to(label),
    );
}

pub fn status(label: &str, message: &str) {
    status_with(Tone::Action, label, message);
}

pub fn status_info(label: &str, message: &str) {
    status_with(Tone::Info, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    status_with(Tone::Warn, label, message);
}
