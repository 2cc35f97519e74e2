use time::OffsetDateTime;

use super::Severity;

/// One log occurrence captured from the host.
///
/// Events are built once by the [`FileLogger`](super::FileLogger) and never
/// mutated afterwards. The queue owns them until the writer pops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    severity: Severity,
    message: String,
    trace: String,
    timestamp: OffsetDateTime,
}

impl LogEvent {
    pub fn new(severity: Severity, message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::with_timestamp(severity, message, trace, now())
    }

    pub fn with_timestamp(
        severity: Severity,
        message: impl Into<String>,
        trace: impl Into<String>,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            trace: trace.into(),
            timestamp,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Supplementary text such as a stack trace. Empty when the host sent none.
    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

/// Current wall-clock time in the local offset, UTC if the offset is unknown.
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = LogEvent::new(Severity::Warning, "texture cache low", "");
        assert_eq!(event.severity(), Severity::Warning);
        assert_eq!(event.message(), "texture cache low");
        assert!(event.trace().is_empty());
    }

    #[test]
    fn test_event_keeps_timestamp() {
        let ts = OffsetDateTime::UNIX_EPOCH;
        let event = LogEvent::with_timestamp(Severity::Error, "boom", "at main", ts);
        assert_eq!(event.timestamp(), ts);
        assert_eq!(event.trace(), "at main");
    }
}
