// Background writer: waits on the wake signal, drains, filters, writes

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

use super::errors::Result;
use super::queue::EventQueue;
use super::severity::{self, Severity};
use super::sink::FileSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    WaitingForSignal,
    Draining,
    Stopped,
}

/// Counters reported by the writer when it stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriterStats {
    /// Records written to the file
    pub written: u64,
    /// Events discarded by the level filter
    pub filtered: u64,
    /// Completed drain cycles, including empty ones
    pub cycles: u64,
}

/// Single consumer of an [`EventQueue`] and sole owner of a [`FileSink`].
pub struct WriterLoop {
    queue: Arc<EventQueue>,
    threshold: Arc<AtomicU8>,
    sink: FileSink,
    state: WriterState,
    stats: WriterStats,
}

impl WriterLoop {
    /// `threshold` holds a [`Severity`] as u8 and is read once per drained event.
    pub fn new(queue: Arc<EventQueue>, threshold: Arc<AtomicU8>, sink: FileSink) -> Self {
        Self {
            queue,
            threshold,
            sink,
            state: WriterState::WaitingForSignal,
            stats: WriterStats::default(),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Run until a stop is requested on the queue, then drain once more and
    /// close the sink. Any write error ends the loop and is returned.
    pub fn run(mut self) -> Result<WriterStats> {
        log::debug!("Writer started for {}", self.sink.path().display());

        let outcome = self.run_cycles();
        let closed = self.sink.close();
        self.state = WriterState::Stopped;

        match &outcome {
            Ok(()) => log::debug!(
                "Writer stopped: {} written, {} filtered, {} cycles",
                self.stats.written,
                self.stats.filtered,
                self.stats.cycles
            ),
            Err(err) => log::error!("Writer failed: {err}"),
        }

        outcome?;
        closed?;
        Ok(self.stats)
    }

    fn run_cycles(&mut self) -> Result<()> {
        loop {
            self.state = WriterState::WaitingForSignal;
            let stopping = self.queue.wait();

            self.drain()?;

            if stopping {
                break;
            }

            // Stays armed if producers pushed during the drain
            self.queue.settle();
        }

        // Catch anything pushed between the last drain and the stop request
        self.drain()?;
        Ok(())
    }

    /// One drain cycle: pop everything, write what passes the filter, flush.
    ///
    /// Returns the number of records written. Draining an empty queue only
    /// flushes.
    pub fn drain(&mut self) -> Result<usize> {
        self.state = WriterState::Draining;
        self.sink.begin_drain()?;

        let mut written = 0;
        while let Some(event) = self.queue.pop() {
            let threshold =
                Severity::from_u8(self.threshold.load(Ordering::Relaxed)).unwrap_or_default();

            if !severity::keep(threshold, event.severity()) {
                self.stats.filtered += 1;
                continue;
            }

            self.sink.write_event(&event)?;
            written += 1;
        }

        self.sink.end_drain()?;
        self.stats.written += written as u64;
        self.stats.cycles += 1;
        self.state = WriterState::WaitingForSignal;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::errors::LoggerError;
    use crate::logger::sink::SinkStatus;
    use crate::logger::LogEvent;
    use std::fs;

    fn setup(threshold: Severity) -> (tempfile::TempDir, Arc<EventQueue>, Arc<AtomicU8>, WriterLoop) {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::open(dir.path().join("writer.log")).unwrap();
        let queue = Arc::new(EventQueue::new());
        let threshold = Arc::new(AtomicU8::new(threshold.as_u8()));
        let writer = WriterLoop::new(Arc::clone(&queue), Arc::clone(&threshold), sink);
        (dir, queue, threshold, writer)
    }

    #[test]
    fn test_drain_filters_below_threshold() {
        let (dir, queue, _threshold, mut writer) = setup(Severity::Warning);

        queue.push(LogEvent::new(Severity::Info, "info", ""));
        queue.push(LogEvent::new(Severity::Warning, "warning", ""));
        queue.push(LogEvent::new(Severity::Error, "error", ""));

        assert_eq!(writer.drain().unwrap(), 2);
        assert_eq!(writer.stats().filtered, 1);
        assert_eq!(writer.state(), WriterState::WaitingForSignal);

        let content = fs::read_to_string(dir.path().join("writer.log")).unwrap();
        assert_eq!(content, "Warning >>> warning\n\n\r\nError >>> error\n\n\r\n");
    }

    #[test]
    fn test_empty_drain_is_noop() {
        let (dir, _queue, _threshold, mut writer) = setup(Severity::Info);

        assert_eq!(writer.drain().unwrap(), 0);
        assert_eq!(writer.drain().unwrap(), 0);
        assert_eq!(writer.stats().written, 0);
        assert_eq!(writer.stats().cycles, 2);

        let content = fs::read_to_string(dir.path().join("writer.log")).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_threshold_read_per_event() {
        let (_dir, queue, threshold, mut writer) = setup(Severity::Info);

        queue.push(LogEvent::new(Severity::Info, "kept", ""));
        assert_eq!(writer.drain().unwrap(), 1);

        threshold.store(Severity::Error.as_u8(), Ordering::Relaxed);
        queue.push(LogEvent::new(Severity::Info, "dropped", ""));
        queue.push(LogEvent::new(Severity::Error, "kept too", ""));
        assert_eq!(writer.drain().unwrap(), 1);
        assert_eq!(writer.stats().filtered, 1);
    }

    #[test]
    fn test_run_drains_everything_before_stopping() {
        let (dir, queue, _threshold, writer) = setup(Severity::Info);

        let handle = std::thread::spawn(move || writer.run());
        for i in 0..100 {
            queue.push(LogEvent::new(Severity::Info, format!("event {i}"), ""));
        }
        queue.request_stop();

        let stats = handle.join().unwrap().unwrap();
        assert_eq!(stats.written, 100);

        let content = fs::read_to_string(dir.path().join("writer.log")).unwrap();
        assert_eq!(content.matches("Log >>> event").count(), 100);
        assert!(content.starts_with("Log >>> event 0\n"));
    }

    #[test]
    fn test_unopened_sink_is_fatal() {
        let queue = Arc::new(EventQueue::new());
        let threshold = Arc::new(AtomicU8::new(Severity::Info.as_u8()));
        let writer = WriterLoop::new(Arc::clone(&queue), threshold, FileSink::unopened("nope.log"));

        queue.push(LogEvent::new(Severity::Info, "orphan", ""));
        let result = writer.run();
        assert!(matches!(result, Err(LoggerError::SinkNotOpen(_))));
    }

    #[test]
    fn test_sink_closed_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closed.log");
        let queue = Arc::new(EventQueue::new());
        let threshold = Arc::new(AtomicU8::new(Severity::Info.as_u8()));
        let mut writer = WriterLoop::new(
            Arc::clone(&queue),
            threshold,
            FileSink::open(&path).unwrap(),
        );

        writer.drain().unwrap();
        assert_eq!(writer.sink.status(), SinkStatus::Open);

        queue.request_stop();
        writer.run().unwrap();
        assert!(path.exists());
    }
}
