//! Terminal color support detection and formatting.
//!
//! Only diagnostics on stderr are colored, so colors follow stderr being a
//! terminal and `NO_COLOR` being unset.

use std::env;
use std::io::{self, IsTerminal};

/// Color support detection and formatting
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support automatically
    pub fn detect() -> Self {
        let enabled = Self::should_use_colors();
        Self { enabled }
    }

    /// Force disable colors
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if colors should be used
    fn should_use_colors() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        io::stderr().is_terminal()
    }
}

impl ColorSupport {
    fn paint(&self, code: u8, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    /// Format text in green
    pub fn green(&self, text: &str) -> String {
        self.paint(32, text)
    }

    /// Format text in yellow
    pub fn yellow(&self, text: &str) -> String {
        self.paint(33, text)
    }

    /// Format text in red
    pub fn red(&self, text: &str) -> String {
        self.paint(31, text)
    }

    /// Format text as dim/gray
    pub fn dim(&self, text: &str) -> String {
        self.paint(2, text)
    }
}