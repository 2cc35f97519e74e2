// File sink owned by the writer thread

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::errors::{LoggerError, Result};
use super::LogEvent;

/// Separator between the severity label and the message.
const LABEL_SEPARATOR: &str = " >>> ";

/// Blank line closing every record.
const RECORD_END: &str = "\r\n";

/// Externally visible lifecycle of a [`FileSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    Unopened,
    Open,
    /// Open and inside a drain cycle
    Draining,
    Closed,
}

enum SinkState {
    Unopened,
    Open(BufWriter<File>),
    Closed,
}

/// Plain text log file, one record per kept event:
///
/// ```text
/// <Label> >>> <message>
/// <trace>
/// \r\n
/// ```
pub struct FileSink {
    path: PathBuf,
    state: SinkState,
    draining: bool,
    records: u64,
}

impl FileSink {
    /// Sink bound to `path` with no file behind it yet.
    pub fn unopened(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: SinkState::Unopened,
            draining: false,
            records: 0,
        }
    }

    /// Create (or truncate) the file at `path`, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.file_name().is_none() {
            return Err(LoggerError::InvalidFileName(path.display().to_string()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LoggerError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(&path).map_err(|source| LoggerError::OpenSink {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            state: SinkState::Open(BufWriter::new(file)),
            draining: false,
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> SinkStatus {
        match self.state {
            SinkState::Unopened => SinkStatus::Unopened,
            SinkState::Open(_) if self.draining => SinkStatus::Draining,
            SinkState::Open(_) => SinkStatus::Open,
            SinkState::Closed => SinkStatus::Closed,
        }
    }

    /// Records written since the sink was opened.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn begin_drain(&mut self) -> Result<()> {
        self.writer()?;
        self.draining = true;
        Ok(())
    }

    /// Flush and leave the drain cycle.
    pub fn end_drain(&mut self) -> Result<()> {
        self.draining = false;
        self.flush()
    }

    pub fn write_event(&mut self, event: &LogEvent) -> Result<()> {
        let writer = self.writer()?;
        write!(
            writer,
            "{}{}{}\n{}\n{}",
            event.severity().label(),
            LABEL_SEPARATOR,
            event.message(),
            event.trace(),
            RECORD_END
        )
        .map_err(LoggerError::Write)?;
        self.records += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer()?.flush().map_err(LoggerError::Write)
    }

    /// Flush and release the file handle. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.draining = false;
        match std::mem::replace(&mut self.state, SinkState::Closed) {
            SinkState::Open(mut writer) => writer.flush().map_err(LoggerError::Write),
            SinkState::Closed => Ok(()),
            SinkState::Unopened => Err(LoggerError::SinkNotOpen("close before open")),
        }
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        match &mut self.state {
            SinkState::Open(writer) => Ok(writer),
            SinkState::Unopened => Err(LoggerError::SinkNotOpen("sink was never opened")),
            SinkState::Closed => Err(LoggerError::SinkNotOpen("sink already closed")),
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("status", &self.status())
            .field("records", &self.records)
            .finish()
    }
}
