//! Console front end.
//!
//! Decorates application messages the way the host console shows them
//! (prefix, time, thread, color) and emits them into the [`HostLogSource`],
//! where the file logger and any other listener pick them up.

mod color;

pub use color::LogColor;

use std::fmt::Display;
use std::sync::Arc;
use std::thread;

use time::format_description::FormatItem;

use crate::config::LogConfig;
use crate::host::{HostLogKind, HostLogSource, RawLogEvent};

const CONSOLE_TIMESTAMP_FORMAT: &[FormatItem] =
    time::macros::format_description!("[hour]:[minute]:[second]-[subsecond digits:3]");

pub struct Console {
    config: LogConfig,
    source: Arc<HostLogSource>,
}

impl Console {
    pub fn new(config: LogConfig, source: Arc<HostLogSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn log(&self, message: impl Display) {
        self.emit(HostLogKind::Log, LogColor::Default, message);
    }

    pub fn log_colored(&self, message: impl Display, color: LogColor) {
        self.emit(HostLogKind::Log, color, message);
    }

    pub fn warning(&self, message: impl Display) {
        self.emit(HostLogKind::Warning, LogColor::Default, message);
    }

    pub fn warning_colored(&self, message: impl Display, color: LogColor) {
        self.emit(HostLogKind::Warning, color, message);
    }

    pub fn error(&self, message: impl Display) {
        self.emit(HostLogKind::Error, LogColor::Default, message);
    }

    pub fn error_colored(&self, message: impl Display, color: LogColor) {
        self.emit(HostLogKind::Error, color, message);
    }

    /// `message` followed by `args`, concatenated without separators.
    pub fn log_args(&self, message: impl Display, color: LogColor, args: &[&dyn Display]) {
        self.emit(HostLogKind::Log, color, concat_message(message, args));
    }

    pub fn warning_args(&self, message: impl Display, color: LogColor, args: &[&dyn Display]) {
        self.emit(HostLogKind::Warning, color, concat_message(message, args));
    }

    pub fn error_args(&self, message: impl Display, color: LogColor, args: &[&dyn Display]) {
        self.emit(HostLogKind::Error, color, concat_message(message, args));
    }

    /// Decorate, color and hand the message to the host. No-op when logging is disabled.
    pub fn emit(&self, kind: HostLogKind, color: LogColor, message: impl Display) {
        if !self.config.enable_log {
            return;
        }

        let decorated = self.decorate(&message.to_string(), color);
        self.source
            .emit(RawLogEvent::new(kind, color.paint(&decorated), String::new()));
    }

    /// `<prefix>[ [time]][ [Thread:id]][ [Color]] <message>`
    pub fn decorate(&self, message: &str, color: LogColor) -> String {
        let mut line = String::with_capacity(self.config.prefix.len() + message.len() + 48);
        line.push_str(&self.config.prefix);

        if self.config.show_timestamp {
            if let Ok(stamp) = crate::logger::now().format(CONSOLE_TIMESTAMP_FORMAT) {
                line.push_str(&format!(" [{stamp}]"));
            }
        }
        if self.config.show_thread_id {
            line.push_str(&format!(" [Thread:{}]", thread_number()));
        }
        if self.config.show_color_name {
            line.push_str(&format!(" [{color}]"));
        }

        line.push(' ');
        line.push_str(message);
        line
    }
}

fn concat_message(message: impl Display, args: &[&dyn Display]) -> String {
    let mut out = message.to_string();
    for arg in args {
        out.push_str(&arg.to_string());
    }
    out
}

/// Numeric part of the current thread id.
fn thread_number() -> String {
    let id = format!("{:?}", thread::current().id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LogSource;
    use parking_lot::Mutex;

    fn capture(source: &HostLogSource) -> Arc<Mutex<Vec<RawLogEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        source.subscribe(Arc::new(move |event: &RawLogEvent| sink.lock().push(event.clone())));
        seen
    }

    #[test]
    fn test_plain_decoration() {
        let source = Arc::new(HostLogSource::new());
        let seen = capture(&source);
        let console = Console::new(LogConfig::default().without_decorations(), Arc::clone(&source));

        console.log("Game started successfully!");

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HostLogKind::Log);
        assert_eq!(events[0].message, "[MonsterLogger] Game started successfully!");
    }

    #[test]
    fn test_colored_warning() {
        let source = Arc::new(HostLogSource::new());
        let seen = capture(&source);
        let config = LogConfig {
            show_timestamp: false,
            show_thread_id: false,
            ..LogConfig::default()
        };
        let console = Console::new(config, Arc::clone(&source));

        console.warning_colored("This is a warning message.", LogColor::Blue);

        let events = seen.lock();
        assert_eq!(events[0].kind, HostLogKind::Warning);
        assert_eq!(
            events[0].message,
            "<color=#0000FF>[MonsterLogger] [Blue] This is a warning message.</color>"
        );
    }

    #[test]
    fn test_full_decoration_shape() {
        let source = Arc::new(HostLogSource::new());
        let console = Console::new(LogConfig::default(), source);

        let line = console.decorate("hello", LogColor::Default);
        assert!(line.starts_with("[MonsterLogger] ["));
        assert!(line.contains(" [Thread:"));
        assert!(line.contains(" [Default] "));
        assert!(line.ends_with(" hello"));
    }

    #[test]
    fn test_disabled_console_emits_nothing() {
        let source = Arc::new(HostLogSource::new());
        let seen = capture(&source);
        let config = LogConfig {
            enable_log: false,
            ..LogConfig::default()
        };

        Console::new(config, Arc::clone(&source)).error("ignored");
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_args_appended_to_message() {
        let source = Arc::new(HostLogSource::new());
        let seen = capture(&source);
        let console = Console::new(LogConfig::default().without_decorations(), Arc::clone(&source));

        console.log_args("hp=", LogColor::Default, &[&42, &"/", &100]);
        console.warning_args("alone", LogColor::Default, &[]);
        console.error_args("Save failed: ", LogColor::Red, &[&"slot ", &3]);

        let events = seen.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, HostLogKind::Log);
        assert_eq!(events[0].message, "[MonsterLogger] hp=42/100");
        assert_eq!(events[1].kind, HostLogKind::Warning);
        assert_eq!(events[1].message, "[MonsterLogger] alone");
        assert_eq!(events[2].kind, HostLogKind::Error);
        assert_eq!(
            events[2].message,
            "<color=#FF0000>[MonsterLogger] Save failed: slot 3</color>"
        );
    }

    #[test]
    fn test_thread_number_is_numeric() {
        assert!(thread_number().chars().all(|c| c.is_ascii_digit()));
    }
}
