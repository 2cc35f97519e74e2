//! Asynchronous file logging.
//!
//! Host events are turned into [`LogEvent`]s on the calling thread and pushed
//! onto an [`EventQueue`]. A single [`WriterLoop`] thread sleeps on the queue's
//! wake signal, drains it, drops events below the configured [`Severity`] and
//! writes the rest to a [`FileSink`]. [`FileLogger`] ties these together and
//! owns the start/stop lifecycle.
//!
//! Shutdown is synchronous: [`FileLogger::shutdown`] returns only after the
//! writer has drained everything admitted before it and closed the file.
//! Nothing is guaranteed if the process dies without calling it.

mod errors;
mod event;
mod facade;
mod queue;
mod severity;
mod sink;
mod writer;


pub use errors::{LoggerError, Result};
pub use event::LogEvent;
pub(crate) use event::now;
pub use facade::FileLogger;
pub use queue::EventQueue;
pub use severity::{keep, Severity};
pub use sink::{FileSink, SinkStatus};
pub use writer::{WriterLoop, WriterState, WriterStats};
