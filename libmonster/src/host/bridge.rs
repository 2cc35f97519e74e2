use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::{HostLogKind, HostLogSource, RawLogEvent};

/// Records from this crate never reach the host, or the writer's own
/// diagnostics would be queued behind the events it is writing.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Forwards `log` crate records into a [`HostLogSource`].
///
/// Chain it into the application's `log` dispatcher and every
/// `log::info!` and friends becomes a host event.
pub struct LogBridge {
    source: Arc<HostLogSource>,
    level: LevelFilter,
}

impl LogBridge {
    pub fn new(source: Arc<HostLogSource>, level: LevelFilter) -> Self {
        Self { source, level }
    }

    pub fn kind_for(level: Level) -> HostLogKind {
        match level {
            Level::Error => HostLogKind::Error,
            Level::Warn => HostLogKind::Warning,
            Level::Info | Level::Debug | Level::Trace => HostLogKind::Log,
        }
    }

    /// `module (file:line)` with whatever parts the record carries.
    fn trace_for(record: &Record) -> String {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.to_string(),
            _ => String::new(),
        };

        match (record.module_path(), location.is_empty()) {
            (Some(module), false) => format!("{module} ({location})"),
            (Some(module), true) => module.to_string(),
            (None, _) => location,
        }
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && !is_own_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        self.source.emit(RawLogEvent::new(
            Self::kind_for(record.level()),
            record.args().to_string(),
            Self::trace_for(record),
        ));
    }

    fn flush(&self) {}
}
