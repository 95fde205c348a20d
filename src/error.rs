//! Error types shared by the allocator, its configuration and the host region.
//!
//! The formatter has no error type: malformed directives and buffer
//! truncation are defined behaviour, not failures.

use thiserror::Error;

/// Failure of a bump allocation.
///
/// Exhaustion is the only way an allocation can fail. The cursor is left
/// exactly where it was before the failed call, so the caller may retry with a
/// smaller request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  #[error("heap exhausted: requested {requested} bytes, {remaining} remaining")]
  Exhausted { requested: usize, remaining: usize },
}

/// Rejected heap window description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
  /// Allocations start at the base, so it has to be word-aligned.
  #[error("heap base {base:#x} is not aligned to {align} bytes")]
  MisalignedBase { base: usize, align: usize },

  #[error("heap size {size:#x} is not a multiple of {align} bytes")]
  MisalignedSize { size: usize, align: usize },

  #[error("heap window {base:#x} + {size:#x} overflows the address space")]
  WindowOverflow { base: usize, size: usize },
}

/// Failure to reserve host memory backing a heap window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegionError {
  #[error("cannot map an empty region")]
  Empty,

  #[error("mmap failed with errno {0}")]
  Map(i32),

  #[error(transparent)]
  Config(#[from] ConfigError),
}
