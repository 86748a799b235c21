//! `[catalog]` and `[logging]` sections

use serde::{Deserialize, Serialize};

/// Tool catalog location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// TOML catalog loaded at startup
    pub path: Option<String>,
}

/// Diagnostic log output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write logs to this file
    pub file: Option<String>,
}
