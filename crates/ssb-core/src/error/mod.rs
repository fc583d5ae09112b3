//! Error types and result aliases for builder operations.
//!
//! Fatal conditions are returned as `SsbError`. Recoverable problems found
//! while assembling a configuration are reported separately as advisories by
//! the config crate, so callers can tell the two apart.

use thiserror::Error;

/// Unified error type for all builder operations
#[derive(Error, Debug)]
pub enum SsbError {
    // Project layout errors
    #[error("Could not find a required file: {name} (searched in {searched_in})")]
    MissingRequiredFile { name: String, searched_in: String },

    // Config errors
    #[error("Failed to parse {file}: {message}")]
    ConfigParse { file: String, message: String },

    #[error("Failed to parse package.json: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for builder operations
pub type SsbResult<T> = Result<T, SsbError>;

impl SsbError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a missing-file error from the absolute path that was checked
    pub fn missing_file(path: &camino::Utf8Path) -> Self {
        Self::MissingRequiredFile {
            name: path.file_name().unwrap_or(path.as_str()).to_string(),
            searched_in: path
                .parent()
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }

    /// True when a file the bundler cannot run without is absent
    pub fn is_missing_file(&self) -> bool {
        matches!(self, SsbError::MissingRequiredFile { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            SsbError::MissingRequiredFile { .. } => Some(
                "Create the file, or point `appIndex` in static-site-builder.config.* at an existing entry",
            ),
            SsbError::ConfigParse { .. } => {
                Some("Check the syntax of static-site-builder.config.json or .toml")
            },
            SsbError::JsonParse { .. } => Some("Make sure package.json is valid JSON"),
            _ => None,
        }
    }
}
