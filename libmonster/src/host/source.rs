use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logger::Severity;

pub type ListenerId = u64;

/// Callback invoked for every event the host emits.
pub type LogCallback = Arc<dyn Fn(&RawLogEvent) + Send + Sync>;

/// Log kinds reported by the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostLogKind {
    Log,
    Warning,
    Error,
    Assert,
    Exception,
}

impl HostLogKind {
    /// Parse the textual tag the host attaches to an event.
    ///
    /// Matching is case-insensitive; `Info` is accepted as an alias of `Log`
    /// and `Warn` of `Warning`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "log" | "info" => Some(HostLogKind::Log),
            "warning" | "warn" => Some(HostLogKind::Warning),
            "error" => Some(HostLogKind::Error),
            "assert" => Some(HostLogKind::Assert),
            "exception" => Some(HostLogKind::Exception),
            _ => None,
        }
    }

    /// Asserts and exceptions are written as errors.
    pub const fn severity(self) -> Severity {
        match self {
            HostLogKind::Log => Severity::Info,
            HostLogKind::Warning => Severity::Warning,
            HostLogKind::Error | HostLogKind::Assert | HostLogKind::Exception => Severity::Error,
        }
    }
}

impl From<Severity> for HostLogKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => HostLogKind::Log,
            Severity::Warning => HostLogKind::Warning,
            Severity::Error => HostLogKind::Error,
        }
    }
}

/// Event exactly as the host hands it over, before any decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogEvent {
    pub kind: HostLogKind,
    pub message: String,
    pub trace: String,
}

impl RawLogEvent {
    pub fn new(kind: HostLogKind, message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// Build from a textual tag, `None` when the tag is unknown.
    pub fn from_tag(tag: &str, message: impl Into<String>, trace: impl Into<String>) -> Option<Self> {
        HostLogKind::from_tag(tag).map(|kind| Self::new(kind, message, trace))
    }
}

/// Subscribe/unsubscribe interface of the host's log-event stream.
pub trait LogSource: Send + Sync {
    fn subscribe(&self, callback: LogCallback) -> ListenerId;

    /// Returns false when no listener with this id was registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// In-process log-event source.
///
/// Listeners live in a concurrent map so `emit` may be called from any
/// thread while others subscribe or unsubscribe. Callbacks run on the
/// emitting thread.
#[derive(Default)]
pub struct HostLogSource {
    next_id: AtomicU64,
    listeners: DashMap<ListenerId, LogCallback>,
}

impl HostLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every current listener.
    pub fn emit(&self, event: RawLogEvent) {
        // Snapshot first: a callback may unsubscribe, which needs the shard lock
        let callbacks: Vec<LogCallback> = self
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for callback in callbacks {
            callback(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LogSource for HostLogSource {
    fn subscribe(&self, callback: LogCallback) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, callback);
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

impl std::fmt::Debug for HostLogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLogSource")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
