//! Routes `log` records into the TUI log panel.
//!
//! The terminal is in raw/alternate-screen mode while the app runs, so
//! records are timestamped and sent over a channel instead of printed.

use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct ChannelLogger {
    tx: Sender<String>,
    level: LevelFilter,
}

impl ChannelLogger {
    pub fn new(level: LevelFilter) -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx, level }, rx)
    }

    fn format(record: &Record) -> String {
        format!("{} {:<5} {}", Local::now().format("%H:%M:%S"), record.level(), record.args())
    }
}

impl Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Receiver gone means the UI is shutting down.
            let _ = self.tx.send(Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// Installs the global logger and returns the receiving end for the UI.
pub fn init(level: LevelFilter) -> Result<Receiver<String>, SetLoggerError> {
    let (logger, rx) = ChannelLogger::new(level);
    log::set_logger(Box::leak(Box::new(logger)))?;
    log::set_max_level(level);
    Ok(rx)
}
