//! `log` backend printing through a [`CharSink`].
//!
//! The crate itself only emits records through the `log` facade. Installing
//! a [`SinkLogger`] routes them to the simulator console (or any other sink)
//! as `[LEVEL] target - message` lines.

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::sink::{CharSink, SinkWriter};

/// A [`Log`] implementation writing one line per record to a copy of `sink`.
///
/// Records above `level` are dropped.
#[derive(Debug)]
pub struct SinkLogger<S> {
  sink: S,
  level: LevelFilter,
}

impl<S> SinkLogger<S> {
  /// Creates a logger; `const` so it can live in a `static` for
  /// [`init_logger`].
  pub const fn new(
    sink: S,
    level: LevelFilter,
  ) -> Self {
    Self { sink, level }
  }

  pub const fn level(&self) -> LevelFilter {
    self.level
  }
}

impl<S: CharSink + Copy + Send + Sync> Log for SinkLogger<S> {
  fn enabled(
    &self,
    metadata: &Metadata<'_>,
  ) -> bool {
    metadata.level() <= self.level
  }

  fn log(
    &self,
    record: &Record<'_>,
  ) {
    if !self.enabled(record.metadata()) {
      return;
    }

    let mut writer = SinkWriter::new(self.sink);
    // Sinks cannot fail, so neither can the writer.
    let _ = writeln!(
      writer,
      "[{}] {} - {}",
      record.level(),
      record.target(),
      record.args()
    );
  }

  fn flush(&self) {}
}

/// Installs `logger` as the global `log` backend and sets the maximum level
/// to the logger's own.
///
/// # Safety
///
/// Must not race with any other logging call or logger installation. On the
/// single-threaded target this means calling it once, before anything logs.
pub unsafe fn init_logger<S>(
  logger: &'static SinkLogger<S>,
) -> Result<(), SetLoggerError>
where
  S: CharSink + Copy + Send + Sync + 'static,
{
  unsafe {
    log::set_logger_racy(logger)?;
    log::set_max_level_racy(logger.level());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use log::Level;
  use std::sync::Mutex;

  static CAPTURED: Mutex<Vec<u8>> = Mutex::new(Vec::new());

  fn capture(c: u8) {
    CAPTURED.lock().unwrap().push(c);
  }

  #[test]
  fn test_logger_writes_lines_and_filters() {
    let logger = SinkLogger::new(capture as fn(u8), LevelFilter::Info);

    logger.log(
      &Record::builder()
        .level(Level::Warn)
        .target("simrt::bump")
        .args(format_args!("heap exhausted: requested {} bytes", 16))
        .build(),
    );
    logger.log(
      &Record::builder()
        .level(Level::Debug)
        .target("simrt::printf")
        .args(format_args!("dropped"))
        .build(),
    );

    let captured = CAPTURED.lock().unwrap();
    assert_eq!(
      String::from_utf8_lossy(&captured),
      "[WARN] simrt::bump - heap exhausted: requested 16 bytes\n"
    );
  }

  #[test]
  fn test_enabled_respects_level() {
    let logger = SinkLogger::new(capture as fn(u8), LevelFilter::Warn);

    assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
    assert!(!logger.enabled(&Metadata::builder().level(Level::Info).build()));
    assert_eq!(logger.level(), LevelFilter::Warn);
  }
}
