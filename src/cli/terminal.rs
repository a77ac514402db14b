//! Terminal capability detection and utilities

use std::sync::OnceLock;

use owo_colors::{OwoColorize, colors::css};

/// Whether colored output should be enabled, detected once per process
pub fn supports_color() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| supports_color::on(supports_color::Stream::Stdout).is_some())
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// Shortens `line` to fit in `width` columns, marking the cut with an
/// ellipsis.
pub fn clip(line: &str, width: Option<usize>) -> String {
    match width {
        Some(width) if width > 1 && line.chars().count() > width => {
            let mut clipped: String = line.chars().take(width - 1).collect();
            clipped.push('…');
            clipped
        }
        _ => line.to_string(),
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

fn styled(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

impl Colorize for str {
    fn success(&self) -> String {
        styled(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        styled(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        styled(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        styled(self, |s| s.dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}
