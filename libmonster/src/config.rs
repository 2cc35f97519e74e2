//! Logger configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! prefix = "[Drill]"
//! min_severity = "Warning"
//! log_dir = "logs"
//! ```
//!
//! The file logger reads the config once, at initialize time. Changing it
//! afterwards requires a shutdown and a new initialize.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;

use crate::logger::{LoggerError, Result, Severity};

const FILENAME_TIMESTAMP_FORMAT: &[FormatItem] =
    time::macros::format_description!("[year]-[month]-[day]-[hour]-[minute]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Master switch for the console front end and the file logger
    pub enable_log: bool,
    /// Text placed in front of every console message
    pub prefix: String,
    pub show_timestamp: bool,
    pub show_thread_id: bool,
    /// Print the color name next to colored messages
    pub show_color_name: bool,
    /// Persist events to a file
    pub enable_file_save: bool,
    /// Events below this severity are not written to the file
    pub min_severity: Severity,
    pub log_dir: PathBuf,
    /// Generated from `app_name` and the current time when unset
    pub log_file_name: Option<String>,
    pub app_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enable_log: true,
            prefix: "[MonsterLogger]".to_string(),
            show_timestamp: true,
            show_thread_id: true,
            show_color_name: true,
            enable_file_save: true,
            min_severity: Severity::Info,
            log_dir: PathBuf::from("logs"),
            log_file_name: None,
            app_name: "monster".to_string(),
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoggerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    #[must_use]
    pub fn with_file_save(mut self, enabled: bool) -> Self {
        self.enable_file_save = enabled;
        self
    }

    #[must_use]
    pub fn without_decorations(mut self) -> Self {
        self.show_timestamp = false;
        self.show_thread_id = false;
        self.show_color_name = false;
        self
    }

    /// File name used when `log_file_name` is unset: `{app_name}{yyyy-MM-dd-HH-mm}.log`.
    pub fn default_file_name(&self) -> String {
        let stamp = crate::logger::now()
            .format(FILENAME_TIMESTAMP_FORMAT)
            .unwrap_or_default();
        format!("{}{}.log", self.app_name, stamp)
    }

    /// Full path of the log file for the next run.
    pub fn output_path(&self) -> Result<PathBuf> {
        let file_name = self
            .log_file_name
            .clone()
            .unwrap_or_else(|| self.default_file_name());

        let plain = Path::new(&file_name)
            .file_name()
            .is_some_and(|name| name == file_name.as_str());
        if file_name.trim().is_empty() || !plain {
            return Err(LoggerError::InvalidFileName(file_name));
        }

        Ok(self.log_dir.join(file_name))
    }
}
