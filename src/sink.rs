//! Single-character output.
//!
//! Stream-mode formatting pushes every character through a [`CharSink`] as soon
//! as it is produced. On the simulator that is a trap into the supervising
//! layer; on a development host it can be stdout or a closure collecting bytes.

use core::fmt;

/// Blocking, unbuffered, one-character output primitive.
///
/// `put` is called exactly once per character and has no way to report
/// failure or apply backpressure.
pub trait CharSink {
  fn put(
    &mut self,
    c: u8,
  );
}

impl<F: FnMut(u8)> CharSink for F {
  fn put(
    &mut self,
    c: u8,
  ) {
    self(c)
  }
}

/// Adapts a [`CharSink`] to [`core::fmt::Write`], so `write!` can target it.
#[derive(Debug)]
pub struct SinkWriter<S> {
  sink: S,
}

impl<S: CharSink> SinkWriter<S> {
  pub const fn new(sink: S) -> Self {
    Self { sink }
  }

  pub fn into_inner(self) -> S {
    self.sink
  }
}

impl<S: CharSink> fmt::Write for SinkWriter<S> {
  fn write_str(
    &mut self,
    s: &str,
  ) -> fmt::Result {
    for c in s.bytes() {
      self.sink.put(c);
    }
    Ok(())
  }
}

/// Writes every character to the host's standard output with its own
/// `write(2)` call, mirroring the one-trap-per-character behaviour of the
/// simulator.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[cfg(unix)]
impl CharSink for StdoutSink {
  fn put(
    &mut self,
    c: u8,
  ) {
    // The contract has no error path; a failed write drops the character.
    let _ = unsafe { libc::write(libc::STDOUT_FILENO, (&raw const c).cast(), 1) };
  }
}

/// Prints through the simulator's print-character trap.
///
/// The trap sequence itself is target assembly provided by the startup code
/// as `simrt_put_char`, which loads the print opcode and the character into
/// the kernel scratch registers and executes `syscall`.
#[cfg(target_os = "none")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapSink;

#[cfg(target_os = "none")]
unsafe extern "C" {
  fn simrt_put_char(c: u8);
}

#[cfg(target_os = "none")]
impl CharSink for TrapSink {
  fn put(
    &mut self,
    c: u8,
  ) {
    unsafe { simrt_put_char(c) }
  }
}
