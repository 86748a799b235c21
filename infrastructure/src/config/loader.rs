//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["toolgraph.toml", ".toolgraph.toml"];

/// Prefix for environment overrides, e.g. `TOOLGRAPH_PLANNER__MAX_CYCLES=50`
pub const ENV_PREFIX: &str = "TOOLGRAPH_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TOOLGRAPH_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolgraph.toml` or `./.toolgraph.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolgraph/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(Self::global_config_path(), Self::project_config_path(), config_path)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<PathBuf>, project: Option<PathBuf>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/toolgraph/config.toml if set,
    /// otherwise falls back to ~/.config/toolgraph/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolgraph").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for show-config)
    pub fn config_sources(explicit: Option<&Path>) -> Vec<(String, Option<PathBuf>)> {
        let mut sources = Vec::new();
        if let Some(path) = explicit {
            sources.push(("Explicit".to_string(), Some(path.to_path_buf())));
        }
        sources.push(("Project".to_string(), Self::project_config_path()));
        sources.push((
            "Global".to_string(),
            Self::global_config_path().filter(|p| p.exists()),
        ));
        sources
    }
}
