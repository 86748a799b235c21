//! TOML tool catalog files
//!
//! ```toml
//! [[tools]]
//! id = "geocode"
//! name = "Geocode"
//!
//! [[tools.parameters]]
//! name = "address"
//! required = true
//!
//! [[tools.parameters]]
//! name = "lat"
//!
//! [[tools]]
//! id = "forecast"
//! name = "Forecast"
//!
//! [[tools.parameters]]
//! name = "latitude"
//! required = true
//!
//! [[tools.dependencies]]
//! dependency_tool = "geocode"
//! type = "REQUIRED"
//!
//! [[tools.dependencies.mappings]]
//! source_parameter = "lat"
//! target_parameter = "latitude"
//! ```
//!
//! Reading a catalog only parses it; the caller feeds the tools through
//! the catalog service so every entry is validated on the way in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolgraph_domain::Tool;
use tracing::debug;

/// Errors reading or writing a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write catalog {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode catalog: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    tools: Vec<Tool>,
}

/// Reader and writer for TOML tool catalogs
pub struct ToolCatalogFile;

impl ToolCatalogFile {
    pub fn read(path: impl AsRef<Path>) -> Result<Vec<Tool>, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tools = Self::parse(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), tools = tools.len(), "Catalog read");
        Ok(tools)
    }

    /// Parse catalog text. Each tool's dependencies are pointed back at it.
    pub fn parse(content: &str) -> Result<Vec<Tool>, toml::de::Error> {
        let document: CatalogDocument = toml::from_str(content)?;
        Ok(document.tools.into_iter().map(Tool::normalized).collect())
    }

    pub fn write(path: impl AsRef<Path>, tools: &[Tool]) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let document = CatalogDocument {
            tools: tools.to_vec(),
        };
        let content = toml::to_string_pretty(&document)?;
        std::fs::write(path, content).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
