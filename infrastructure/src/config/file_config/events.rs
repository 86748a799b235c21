//! `[events]` section
//!
//! ```toml
//! [events]
//! sink = "jsonl"
//! jsonl_path = "~/.local/state/toolgraph/events.jsonl"
//! graph_topic = "tool-graph-updates"
//! ```

use serde::{Deserialize, Serialize};

/// Where graph update events go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSinkKind {
    /// Emit through `tracing`
    #[default]
    Log,
    /// Append JSON lines to `jsonl_path`
    Jsonl,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEventsConfig {
    pub sink: EventSinkKind,
    pub jsonl_path: Option<String>,
    pub graph_topic: String,
}

impl Default for FileEventsConfig {
    fn default() -> Self {
        Self {
            sink: EventSinkKind::Log,
            jsonl_path: None,
            graph_topic: "tool-graph-updates".to_string(),
        }
    }
}
