//! libmonster
//! Asynchronous file logging for engine hosted applications.
//!
//! The host engine reports log events through a [`host::HostLogSource`].
//! A [`logger::FileLogger`] subscribes to it, queues every event and lets a
//! single background thread write them to disk, so host threads never wait
//! on file I/O. The [`console::Console`] front end decorates application
//! messages before they reach the host, and [`host::LogBridge`] routes the
//! `log` crate macros into the same stream.

pub mod config;
pub mod console;
pub mod host;
pub mod logger;

pub use config::LogConfig;
