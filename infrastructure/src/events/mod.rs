//! Event publisher adapters
//!
//! | Sink | Type | Use |
//! |------|------|-----|
//! | `log` | [`LogEventPublisher`] | Default; events show up in diagnostics |
//! | `jsonl` | [`JsonlEventPublisher`] | Durable append-only event log |
//! | (in-process) | [`ChannelEventPublisher`] | Subscribers in the same process |

mod channel_publisher;
mod jsonl_publisher;
mod log_publisher;

pub use channel_publisher::{ChannelEventPublisher, PublishedEvent};
pub use jsonl_publisher::JsonlEventPublisher;
pub use log_publisher::LogEventPublisher;
