//! Core data types shared by the configuration engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build mode selecting development or production behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Long name, as passed to computed overrides and written to `NODE_ENV`
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Short key used in split override files (`dev` / `prod`)
    pub fn short_name(&self) -> &'static str {
        match self {
            Mode::Development => "dev",
            Mode::Production => "prod",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Development
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Mode::Development),
            "prod" | "production" => Ok(Mode::Production),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::Development.as_str(), "development");
        assert_eq!(Mode::Production.short_name(), "prod");
        assert!(Mode::Production.is_production());
        assert!(!Mode::default().is_production());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("prod".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!("Development".parse::<Mode>().unwrap(), Mode::Development);
        assert!("staging".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&Mode::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }
}
