//! Host side of the pipeline: the log-event source and the `log` crate bridge.

mod bridge;
mod source;

pub use bridge::LogBridge;
pub use source::{HostLogKind, HostLogSource, ListenerId, LogCallback, LogSource, RawLogEvent};
