//! package.json parsing
//!
//! Only the fields the configuration engine reads are typed; everything else
//! in the manifest is ignored.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ssb_core::error::SsbError;
use crate::ConfigResult;

/// The subset of package.json consumed by the builder
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageJson {
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Homepage URL, used to infer the served path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Private flag
    #[serde(default)]
    pub private: bool,

    /// Workspace configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<WorkspacesConfig>,

    /// Builder options kept in the manifest instead of an override file
    #[serde(
        default,
        rename = "staticSiteBuilderConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub static_site_builder_config: Option<Map<String, Value>>,
}

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkspacesConfig {
    /// Simple array of workspace globs
    Simple(Vec<String>),
    /// Detailed workspace configuration
    Detailed {
        packages: Vec<String>,
        #[serde(default)]
        nohoist: Vec<String>,
    },
    /// Any other shape; carries no patterns
    Unrecognized(Value),
}

impl WorkspacesConfig {
    /// Declared glob patterns, if the shape is one we understand
    pub fn patterns(&self) -> Option<&[String]> {
        match self {
            WorkspacesConfig::Simple(packages) => Some(packages),
            WorkspacesConfig::Detailed { packages, .. } => Some(packages),
            WorkspacesConfig::Unrecognized(_) => None,
        }
    }
}

/// Parse JSON string to PackageJson configuration
pub fn parse_package_json(content: &str) -> ConfigResult<PackageJson> {
    serde_json::from_str(content)
        .map_err(|e| SsbError::JsonParse {
            message: format!("JSON parsing error: {}", e),
        })
}

/// Load and parse package.json from file path
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<PackageJson> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SsbError::io(format!("Failed to read {}", path), e))?;

    parse_package_json(&content)
        .map_err(|e| match e {
            SsbError::JsonParse { message } => SsbError::JsonParse {
                message: format!("In file {}: {}", path, message),
            },
            other => other,
        })
}

/// Load package.json if it exists; a missing manifest is not an error
pub fn load_optional(path: &Utf8Path) -> ConfigResult<Option<PackageJson>> {
    if !path.is_file() {
        return Ok(None);
    }
    load_from_file(path).map(Some)
}
