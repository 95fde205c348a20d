use core::alloc::Layout;

use log::{trace, warn};

use crate::{
  align::{WORD_SIZE, align_up},
  config::HeapConfig,
  error::AllocError,
};

/// Target address handed out by the allocator.
///
/// The window may live outside the host's address space (the simulator heap
/// sits at `0xee000000`), so allocations are plain addresses rather than
/// pointers. Cast to a pointer where the window is known to be mapped.
pub type Address = usize;

/// Monotonic allocator over a fixed address window.
///
/// Every allocation returns the current cursor and moves it forward; nothing
/// is ever given back. The cursor is rounded up to the next word after each
/// allocation, so every returned address is word-aligned.
///
/// The allocator is not synchronised. Sharing one instance between an
/// interrupt handler and the main program breaks the monotonic cursor.
#[derive(Debug)]
pub struct BumpAllocator {
  config: HeapConfig,
  cursor: Address,
}

impl BumpAllocator {
  pub const fn new(config: HeapConfig) -> Self {
    Self {
      cursor: config.base(),
      config,
    }
  }

  /// Hands out `size` bytes at the current cursor.
  ///
  /// On [`AllocError::Exhausted`] the cursor is unchanged. A zero-sized
  /// request succeeds and returns the cursor without moving it.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<Address, AllocError> {
    let placed = self.place(self.cursor, size);
    log_placement(size, WORD_SIZE, &placed);
    placed
  }

  /// Hands out a region satisfying `layout`'s size and alignment.
  ///
  /// The cursor is first rounded up to the requested alignment (at least a
  /// word); the bytes skipped for that are lost like everything else.
  pub fn allocate_layout(
    &mut self,
    layout: Layout,
  ) -> Result<Address, AllocError> {
    let placed = self.place_layout(layout);
    log_placement(layout.size(), layout.align(), &placed);
    placed
  }

  /// [`allocate_layout`](Self::allocate_layout) without the log records.
  ///
  /// The cursor is final when this returns, so the caller may log (and the
  /// logger may allocate) once its borrow of the allocator has ended.
  pub(crate) fn place_layout(
    &mut self,
    layout: Layout,
  ) -> Result<Address, AllocError> {
    match align_up(self.cursor, layout_align(layout)) {
      Some(address) if address <= self.config.end() => self.place(address, layout.size()),
      _ => Err(self.exhausted(layout.size())),
    }
  }

  /// Accepts any address and does nothing with it.
  ///
  /// Freed space is never reused, so this cannot fail and has no effect on
  /// later allocations.
  pub fn deallocate(
    &mut self,
    _address: Address,
  ) {
  }

  pub const fn config(&self) -> &HeapConfig {
    &self.config
  }

  /// Address the next allocation will start at.
  pub const fn cursor(&self) -> Address {
    self.cursor
  }

  /// Bytes consumed so far, alignment padding included.
  pub const fn used(&self) -> usize {
    self.cursor - self.config.base()
  }

  pub const fn remaining(&self) -> usize {
    self.config.end() - self.cursor
  }

  // Moves the cursor past `size` bytes at `address`, rounded up to a word.
  fn place(
    &mut self,
    address: Address,
    size: usize,
  ) -> Result<Address, AllocError> {
    let end = match address.checked_add(size) {
      Some(end) if end <= self.config.end() => end,
      _ => return Err(self.exhausted(size)),
    };

    // The window end is word-aligned, so rounding up cannot leave it.
    self.cursor = crate::align!(end);
    Ok(address)
  }

  fn exhausted(
    &self,
    requested: usize,
  ) -> AllocError {
    AllocError::Exhausted {
      requested,
      remaining: self.remaining(),
    }
  }
}

const fn layout_align(layout: Layout) -> usize {
  if layout.align() > WORD_SIZE {
    layout.align()
  } else {
    WORD_SIZE
  }
}

/// Records the outcome of one allocation: `trace` on success, `warn` on
/// exhaustion.
pub(crate) fn log_placement(
  size: usize,
  align: usize,
  placed: &Result<Address, AllocError>,
) {
  match placed {
    Ok(address) => trace!("allocate {size} bytes (align {align}) at {address:#x}"),
    Err(err) => warn!("{err}"),
  }
}

impl Default for BumpAllocator {
  fn default() -> Self {
    Self::new(HeapConfig::DEFAULT)
  }
}
