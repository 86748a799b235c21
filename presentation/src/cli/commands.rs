//! CLI command definitions

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// CLI arguments for toolgraph
#[derive(Parser, Debug)]
#[command(name = "toolgraph")]
#[command(author, version, about = "Tool dependency graph and execution planner")]
#[command(long_about = r#"
toolgraph loads a catalog of tools, validates their declared dependencies,
and computes execution plans: which tools must run, in what order, which
can run in parallel, and which parameters are still missing.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./toolgraph.toml    Project-level config
3. ~/.config/toolgraph/config.toml   Global config

Environment variables prefixed with TOOLGRAPH_ override all files
(e.g. TOOLGRAPH_PLANNER__MAX_CLOSURE_SIZE=500).

Example:
  toolgraph --catalog tools.toml plan forecast -p city=Paris
  toolgraph --catalog tools.toml graph --required-only --json
  toolgraph --catalog tools.toml impact geocode
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Tool catalog to load (overrides [catalog] path)
    #[arg(long, value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute an execution plan for the given tools
    Plan {
        /// Requested tool ids
        #[arg(required = true, value_name = "TOOL")]
        tools: Vec<String>,

        /// Already known parameter (repeatable); values are parsed as JSON
        /// when possible
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_parameter)]
        params: Vec<(String, Value)>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dependency graph
    Graph {
        /// Leave out optional dependencies
        #[arg(long)]
        required_only: bool,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List dependency cycles
    Cycles,

    /// List everything a tool depends on, directly or transitively
    Closure {
        #[arg(value_name = "TOOL")]
        tool: String,

        /// List dependents instead of dependencies
        #[arg(long)]
        reverse: bool,
    },

    /// List tools affected by a change to the given tool
    Impact {
        #[arg(value_name = "TOOL")]
        tool: String,
    },

    /// Shortest dependency path between two tools
    Path {
        #[arg(value_name = "FROM")]
        from: String,
        #[arg(value_name = "TO")]
        to: String,
    },

    /// Load and validate the catalog, then report its shape
    Validate,

    /// Show configuration file locations and exit
    ShowConfig,
}

/// Parse `key=value`; the value is JSON if it parses, otherwise a string.
pub fn parse_parameter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
