use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{bail, ensure, Context};
use libmonster::console::{Console, LogColor};
use libmonster::host::{HostLogKind, HostLogSource, RawLogEvent};
use libmonster::logger::{FileLogger, LoggerError, Severity};
use libmonster::LogConfig;

/// Each drill writes into its own file under `out_dir`, left behind for inspection.
pub struct Drills {
    out_dir: PathBuf,
}

impl Drills {
    pub fn new(out_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating drill output dir {}", out_dir.display()))?;
        Ok(Self { out_dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.log"))
    }

    fn logger() -> (Arc<HostLogSource>, FileLogger) {
        let source = Arc::new(HostLogSource::new());
        let logger = FileLogger::new(source.clone()).without_timestamps();
        (source, logger)
    }

    pub fn two_event_scenario(&self) -> anyhow::Result<()> {
        let path = self.path("scenario");
        let (source, logger) = Self::logger();

        logger.initialize(&path, Severity::Info)?;
        source.emit(RawLogEvent::new(HostLogKind::Log, "A", ""));
        source.emit(RawLogEvent::new(HostLogKind::Error, "B", ""));
        logger.shutdown()?;

        let content = read(&path)?;
        ensure!(
            content == "Log >>> A\n\n\r\nError >>> B\n\n\r\n",
            "unexpected file content: {content:?}"
        );
        Ok(())
    }

    pub fn filtering(&self) -> anyhow::Result<()> {
        let path = self.path("filtering");
        let (source, logger) = Self::logger();

        logger.initialize(&path, Severity::Warning)?;
        source.emit(RawLogEvent::new(HostLogKind::Log, "info", ""));
        source.emit(RawLogEvent::new(HostLogKind::Warning, "warning", ""));
        source.emit(RawLogEvent::new(HostLogKind::Error, "error", ""));
        let stats = logger.shutdown()?;

        ensure!(stats.written == 2, "expected 2 records, wrote {}", stats.written);
        ensure!(stats.filtered == 1, "expected 1 filtered, got {}", stats.filtered);

        let content = read(&path)?;
        let warning = content.find("Warning >>> warning").context("warning missing")?;
        let error = content.find("Error >>> error").context("error missing")?;
        ensure!(warning < error, "records out of order");
        Ok(())
    }

    pub fn concurrent_producers(&self, producers: usize, events: usize) -> anyhow::Result<()> {
        let path = self.path("concurrent");
        let (source, logger) = Self::logger();
        logger.initialize(&path, Severity::Info)?;

        let handles: Vec<_> = (0..producers)
            .map(|producer| {
                let source = Arc::clone(&source);
                thread::spawn(move || {
                    for seq in 0..events {
                        source.emit(RawLogEvent::new(
                            HostLogKind::Log,
                            format!("p{producer} {seq}"),
                            "",
                        ));
                    }
                })
            })
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                bail!("producer thread panicked");
            }
        }

        let stats = logger.shutdown()?;
        log::info!(
            "{} producers x {} events: {} written in {} cycles",
            producers,
            events,
            stats.written,
            stats.cycles
        );

        let mut next = vec![0usize; producers];
        for line in read(&path)?.lines().filter(|l| l.starts_with("Log >>> p")) {
            let (producer, seq) = line["Log >>> p".len()..]
                .split_once(' ')
                .context("malformed record")?;
            let producer: usize = producer.parse()?;
            let seq: usize = seq.parse()?;
            ensure!(
                seq == next[producer],
                "producer {producer}: expected {}, found {seq}",
                next[producer]
            );
            next[producer] += 1;
        }

        ensure!(
            next.iter().all(|&count| count == events),
            "lost events: {next:?}"
        );
        Ok(())
    }

    pub fn lifecycle_guards(&self) -> anyhow::Result<()> {
        let (source, logger) = Self::logger();

        logger.submit(RawLogEvent::new(HostLogKind::Log, "before initialize", ""));
        ensure!(logger.dropped() == 1, "submit before initialize was not dropped");

        ensure!(
            matches!(logger.shutdown(), Err(LoggerError::NotRunning)),
            "shutdown without initialize must fail"
        );

        logger.initialize(self.path("lifecycle"), Severity::Info)?;
        let second = logger.initialize(self.path("lifecycle-second"), Severity::Info);
        ensure!(
            matches!(second, Err(LoggerError::AlreadyRunning)),
            "second initialize was accepted"
        );
        ensure!(source.listener_count() == 1, "second subscription registered");
        logger.shutdown()?;

        let invalid = logger.initialize(&self.out_dir, Severity::Info);
        ensure!(invalid.is_err(), "directory accepted as log file");
        ensure!(source.listener_count() == 0, "failed initialize left a subscription");
        Ok(())
    }

    pub fn console_front_end(&self, config: &LogConfig) -> anyhow::Result<()> {
        let path = self.path("console");
        let source = Arc::new(HostLogSource::new());
        let logger = FileLogger::new(source.clone());
        logger.initialize(&path, Severity::Info)?;

        let console = Console::new(config.clone(), Arc::clone(&source));
        console.log_colored("Game started successfully!", LogColor::Gray);
        console.warning_colored("This is a warning message.", LogColor::Blue);
        console.error_colored("This is an error message.", LogColor::Green);
        console.log_args("Score: ", LogColor::Default, &[&1200, &" in round ", &3]);
        logger.shutdown()?;

        let content = read(&path)?;
        for expected in ["Log >>> ", "Warning >>> ", "Error >>> ", "<color=#0000FF>", "Score: 1200 in round 3"] {
            ensure!(content.contains(expected), "missing {expected:?} in console drill");
        }
        Ok(())
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
