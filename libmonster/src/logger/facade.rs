// File logger service: host subscription, event submission and lifecycle

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::RwLock;
use time::format_description::FormatItem;

use super::errors::{LoggerError, Result};
use super::event::{self, LogEvent};
use super::queue::EventQueue;
use super::sink::FileSink;
use super::writer::{WriterLoop, WriterStats};
use super::Severity;
use crate::config::LogConfig;
use crate::host::{ListenerId, LogSource, RawLogEvent};

const WRITER_THREAD_NAME: &str = "monster-file-writer";

const MESSAGE_TIMESTAMP_FORMAT: &[FormatItem] =
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    dropped: AtomicU64,
}

/// Producer side of one run: everything a host callback needs to enqueue.
///
/// `admitting` is held shared for the whole check-and-push, so once
/// [`close`](Pipeline::close) returns every admitted event is in the queue
/// and no later one can be.
struct Pipeline {
    queue: Arc<EventQueue>,
    admitting: RwLock<bool>,
    timestamps: bool,
    counters: Arc<Counters>,
}

impl Pipeline {
    fn submit(&self, raw: &RawLogEvent) {
        let admitting = self.admitting.read();
        if !*admitting {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let now = event::now();
        let message = if self.timestamps {
            match now.format(MESSAGE_TIMESTAMP_FORMAT) {
                Ok(stamp) => format!("{} {}", stamp, raw.message),
                Err(_) => raw.message.clone(),
            }
        } else {
            raw.message.clone()
        };

        self.queue.push(LogEvent::with_timestamp(
            raw.kind.severity(),
            message,
            raw.trace.clone(),
            now,
        ));
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Stop admitting. Waits for submissions already past the check.
    fn close(&self) {
        *self.admitting.write() = false;
    }

    fn is_admitting(&self) -> bool {
        *self.admitting.read()
    }
}

struct Running {
    path: PathBuf,
    pipeline: Arc<Pipeline>,
    subscription: ListenerId,
    worker: JoinHandle<Result<WriterStats>>,
}

/// Asynchronous file logger.
///
/// Owns at most one run at a time: a [`FileSink`], the [`WriterLoop`] thread
/// that drains into it and a subscription on the host [`LogSource`].
/// Submitting never blocks on file I/O and never reports errors to the
/// caller; events that cannot be admitted are counted in
/// [`dropped`](FileLogger::dropped).
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use libmonster::host::{HostLogKind, HostLogSource, RawLogEvent};
/// use libmonster::logger::{FileLogger, Severity};
///
/// let source = Arc::new(HostLogSource::new());
/// let logger = FileLogger::new(source.clone());
///
/// logger.initialize("logs/game.log", Severity::Info).unwrap();
/// source.emit(RawLogEvent::new(HostLogKind::Log, "Game started", ""));
///
/// let stats = logger.shutdown().unwrap();
/// assert_eq!(stats.written, 1);
/// ```
pub struct FileLogger {
    source: Arc<dyn LogSource>,
    threshold: Arc<AtomicU8>,
    timestamps: bool,
    counters: Arc<Counters>,
    run: RwLock<Option<Running>>,
}

impl FileLogger {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            threshold: Arc::new(AtomicU8::new(Severity::Info.as_u8())),
            timestamps: true,
            counters: Arc::default(),
            run: RwLock::new(None),
        }
    }

    /// Don't prefix messages with the submission time.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Open `path` and start writing events of at least `min_severity`.
    ///
    /// The file is created, or truncated if it exists. Invalid paths fail
    /// here, before any thread is started. Fails with
    /// [`LoggerError::AlreadyRunning`] if a previous run was not shut down.
    pub fn initialize(&self, path: impl AsRef<Path>, min_severity: Severity) -> Result<PathBuf> {
        let mut run = self.run.write();
        if run.is_some() {
            return Err(LoggerError::AlreadyRunning);
        }

        let path = path.as_ref().to_path_buf();
        let sink = FileSink::open(&path)?;

        self.threshold.store(min_severity.as_u8(), Ordering::Relaxed);

        let pipeline = Arc::new(Pipeline {
            queue: Arc::new(EventQueue::new()),
            admitting: RwLock::new(true),
            timestamps: self.timestamps,
            counters: Arc::clone(&self.counters),
        });

        let writer = WriterLoop::new(Arc::clone(&pipeline.queue), Arc::clone(&self.threshold), sink);
        let worker_pipeline = Arc::clone(&pipeline);
        let worker = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || {
                let result = writer.run();
                if result.is_err() {
                    // Nobody drains any more, stop admitting events
                    worker_pipeline.close();
                }
                result
            })
            .map_err(LoggerError::WorkerSpawn)?;

        let callback_pipeline = Arc::clone(&pipeline);
        let subscription = self
            .source
            .subscribe(Arc::new(move |raw: &RawLogEvent| callback_pipeline.submit(raw)));

        log::debug!("File logging to {} at {}", path.display(), min_severity);

        *run = Some(Running {
            path: path.clone(),
            pipeline,
            subscription,
            worker,
        });

        Ok(path)
    }

    /// Start from a [`LogConfig`]. Returns `Ok(None)` when file saving is disabled.
    pub fn initialize_with(&self, config: &LogConfig) -> Result<Option<PathBuf>> {
        if !config.enable_log || !config.enable_file_save {
            log::debug!("File logging disabled by config");
            return Ok(None);
        }

        let path = config.output_path()?;
        self.initialize(path, config.min_severity).map(Some)
    }

    /// Enqueue an event for the writer. Dropped when not running.
    pub fn submit(&self, raw: RawLogEvent) {
        match self.run.read().as_ref() {
            Some(run) => run.pipeline.submit(&raw),
            None => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Like [`submit`](FileLogger::submit) with a textual host tag. Unknown tags are dropped.
    pub fn submit_tagged(&self, tag: &str, message: impl Into<String>, trace: impl Into<String>) {
        match RawLogEvent::from_tag(tag, message, trace) {
            Some(raw) => self.submit(raw),
            None => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Stop the current run and wait until every admitted event is on disk.
    ///
    /// Unsubscribes from the host first so nothing new races the final
    /// drain, then wakes the writer and joins it. The file is closed when
    /// this returns. A write error hit by the writer during the run is
    /// returned here.
    pub fn shutdown(&self) -> Result<WriterStats> {
        let run = self.run.write().take().ok_or(LoggerError::NotRunning)?;

        self.source.unsubscribe(run.subscription);
        run.pipeline.close();
        run.pipeline.queue.request_stop();

        let stats = run.worker.join().map_err(|_| LoggerError::WorkerPanicked)??;

        log::debug!(
            "File logging to {} stopped, {} records written",
            run.path.display(),
            stats.written
        );

        Ok(stats)
    }

    /// True between a successful initialize and shutdown, unless the writer failed.
    pub fn is_running(&self) -> bool {
        self.run
            .read()
            .as_ref()
            .is_some_and(|run| run.pipeline.is_admitting())
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.run.read().as_ref().map(|run| run.path.clone())
    }

    /// Change the threshold. Applies from the next event the writer drains,
    /// including events already queued.
    pub fn set_min_severity(&self, severity: Severity) {
        self.threshold.store(severity.as_u8(), Ordering::Relaxed);
    }

    pub fn min_severity(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Events waiting for the writer, counted before filtering.
    pub fn queue_len(&self) -> usize {
        self.run
            .read()
            .as_ref()
            .map_or(0, |run| run.pipeline.queue.len())
    }

    /// Events admitted into the queue. A run that shuts down cleanly has
    /// written or filtered every one of them.
    pub fn submitted(&self) -> u64 {
        self.counters.submitted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        if self.run.get_mut().is_some() {
            if let Err(err) = self.shutdown() {
                log::warn!("File logger shutdown on drop failed: {err}");
            }
        }
    }
}

impl std::fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLogger")
            .field("output_path", &self.output_path())
            .field("min_severity", &self.min_severity())
            .field("running", &self.is_running())
            .finish()
    }
}
