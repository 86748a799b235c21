//! Configuration file loading for toolgraph
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLGRAPH_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolgraph.toml` or `./.toolgraph.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/toolgraph/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, EventSinkKind, FileCacheConfig, FileCatalogConfig, FileConfig,
    FileEventsConfig, FileLoggingConfig, FilePlannerConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
