// Severity levels and the drain-time level filter

use serde::{Deserialize, Serialize};

/// Log severity, ordered from most verbose to least verbose.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    /// Regular log output
    #[default]
    Info = 0,
    /// Something unexpected, the application keeps going
    Warning = 1,
    /// Failures, asserts and exceptions reported by the host
    Error = 2,
}

impl Severity {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 value (returns None if invalid)
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::Info),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            _ => None,
        }
    }

    /// Label written in front of every record in the log file.
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Info => "Log",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keep an event when its severity reaches the configured threshold.
#[inline]
pub fn keep(threshold: Severity, severity: Severity) -> bool {
    severity >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_from_u8() {
        assert_eq!(Severity::from_u8(0), Some(Severity::Info));
        assert_eq!(Severity::from_u8(2), Some(Severity::Error));
        assert_eq!(Severity::from_u8(3), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Severity::Info.label(), "Log");
        assert_eq!(Severity::Warning.to_string(), "Warning");
        assert_eq!(Severity::Error.to_string(), "Error");
    }

    #[test]
    fn test_keep() {
        assert!(keep(Severity::Info, Severity::Info));
        assert!(keep(Severity::Info, Severity::Error));
        assert!(!keep(Severity::Warning, Severity::Info));
        assert!(keep(Severity::Warning, Severity::Warning));
        assert!(!keep(Severity::Error, Severity::Warning));
        assert!(keep(Severity::Error, Severity::Error));
    }
}
