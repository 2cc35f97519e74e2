use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("Failed to open log file at {path}: {source}")]
    OpenSink { path: PathBuf, source: io::Error },

    #[error("Log file name is empty or not a plain file name: {0:?}")]
    InvalidFileName(String),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Write to log file failed: {0}")]
    Write(#[source] io::Error),

    #[error("Write attempted on a log file that is not open ({0})")]
    SinkNotOpen(&'static str),

    #[error("File logger is already running")]
    AlreadyRunning,

    #[error("File logger is not running")]
    NotRunning,

    #[error("Failed to spawn writer thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("Writer thread panicked")]
    WorkerPanicked,
}
