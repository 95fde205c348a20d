//! Heap window configuration.
//!
//! The bump allocator manages a single fixed window of the target address
//! space. Its boundaries are plain data so they can come from a linker map, a
//! constant in firmware, or a JSON file read by a host-side tool.

use serde::Deserialize;

use crate::align::{WORD_SIZE, is_aligned};
use crate::error::ConfigError;

/// Default boundaries of the simulator heap window.
pub mod defaults {
  /// Base address of the heap window.
  pub const HEAP_BASE: usize = 0xee00_0000;

  /// Size of the heap window (512 KiB).
  pub const HEAP_SIZE: usize = 0x0008_0000;
}

/// Boundaries of the memory window handed out by a [`BumpAllocator`].
///
/// [`BumpAllocator`]: crate::BumpAllocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawHeapConfig")]
pub struct HeapConfig {
  base: usize,
  size: usize,
}

impl HeapConfig {
  /// The simulator's heap window: `0xee000000`, 512 KiB.
  pub const DEFAULT: Self = Self {
    base: defaults::HEAP_BASE,
    size: defaults::HEAP_SIZE,
  };

  /// Describes the window `[base, base + size)`.
  ///
  /// Both ends must be word-aligned so the cursor can always be rounded up to
  /// a word without leaving the window. The window must not wrap around the
  /// end of the address space.
  pub const fn new(
    base: usize,
    size: usize,
  ) -> Result<Self, ConfigError> {
    if !is_aligned(base, WORD_SIZE) {
      return Err(ConfigError::MisalignedBase {
        base,
        align: WORD_SIZE,
      });
    }

    if !is_aligned(size, WORD_SIZE) {
      return Err(ConfigError::MisalignedSize {
        size,
        align: WORD_SIZE,
      });
    }

    if base.checked_add(size).is_none() {
      return Err(ConfigError::WindowOverflow { base, size });
    }

    Ok(Self { base, size })
  }

  pub const fn base(&self) -> usize {
    self.base
  }

  pub const fn size(&self) -> usize {
    self.size
  }

  /// First address past the window.
  pub const fn end(&self) -> usize {
    self.base + self.size
  }

  pub const fn contains(
    &self,
    address: usize,
  ) -> bool {
    address >= self.base && address < self.end()
  }
}

impl Default for HeapConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

// Deserialized fields go through `HeapConfig::new` so a config file cannot
// describe a window the allocator would mishandle.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawHeapConfig {
  base: usize,
  size: usize,
}

impl Default for RawHeapConfig {
  fn default() -> Self {
    Self {
      base: defaults::HEAP_BASE,
      size: defaults::HEAP_SIZE,
    }
  }
}

impl TryFrom<RawHeapConfig> for HeapConfig {
  type Error = ConfigError;

  fn try_from(raw: RawHeapConfig) -> Result<Self, Self::Error> {
    Self::new(raw.base, raw.size)
  }
}
