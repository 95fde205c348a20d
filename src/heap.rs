use core::{
  alloc::{GlobalAlloc, Layout},
  cell::UnsafeCell,
  ptr,
};

use crate::{
  bump::{self, Address, BumpAllocator},
  config::HeapConfig,
};

/// A [`BumpAllocator`] usable as the program's `#[global_allocator]`.
///
/// ```rust,ignore
/// #[global_allocator]
/// static HEAP: SimHeap = SimHeap::new(HeapConfig::DEFAULT);
/// ```
///
/// Exhaustion returns a null pointer, which `alloc` turns into its
/// allocation error handler. `dealloc` is a no-op.
///
/// There is no locking. The heap must only ever be used from one thread of
/// execution, and never from an interrupt handler that can preempt it.
///
/// Allocation records are logged after the cursor has moved and the inner
/// allocator is released, so an installed logger may itself allocate from
/// this heap.
#[derive(Debug)]
pub struct SimHeap {
  inner: UnsafeCell<BumpAllocator>,
}

// SAFETY: the type is only sound under the single-thread precondition above,
// which matches the simulator: one hart, no preemptive scheduler.
unsafe impl Sync for SimHeap {}

impl SimHeap {
  pub const fn new(config: HeapConfig) -> Self {
    Self {
      inner: UnsafeCell::new(BumpAllocator::new(config)),
    }
  }

  pub fn cursor(&self) -> Address {
    unsafe { (*self.inner.get()).cursor() }
  }

  pub fn remaining(&self) -> usize {
    unsafe { (*self.inner.get()).remaining() }
  }
}

unsafe impl GlobalAlloc for SimHeap {
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    let placed = unsafe { (*self.inner.get()).place_layout(layout) };
    bump::log_placement(layout.size(), layout.align(), &placed);

    match placed {
      Ok(address) => ptr::with_exposed_provenance_mut(address),
      Err(_) => ptr::null_mut(),
    }
  }

  unsafe fn dealloc(
    &self,
    address: *mut u8,
    _layout: Layout,
  ) {
    let allocator = unsafe { &mut *self.inner.get() };

    allocator.deallocate(address.expose_provenance());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[cfg(unix)]
  #[test]
  fn test_global_alloc_over_host_region() {
    use crate::HostRegion;

    let region = HostRegion::map(256).unwrap();
    let heap = SimHeap::new(region.config());

    unsafe {
      let byte = heap.alloc(Layout::new::<u8>());
      let word = heap.alloc(Layout::new::<u64>()) as *mut u64;

      assert_eq!(byte, region.as_ptr());
      assert_eq!(word as usize % align_of::<u64>(), 0);
      assert!(word as usize > byte as usize);

      word.write(0x1122_3344_5566_7788);
      heap.dealloc(byte, Layout::new::<u8>());

      assert_eq!(word.read(), 0x1122_3344_5566_7788);
      assert!(heap.alloc(Layout::new::<u8>()) as usize > word as usize);
    }
  }

  #[test]
  fn test_exhaustion_returns_null() {
    let heap = SimHeap::new(HeapConfig::new(0x1000, 16).unwrap());

    unsafe {
      assert!(heap.alloc(Layout::from_size_align(32, 4).unwrap()).is_null());
      assert_eq!(heap.cursor(), 0x1000);

      assert_eq!(heap.alloc(Layout::from_size_align(16, 4).unwrap()) as usize, 0x1000);
      assert_eq!(heap.remaining(), 0);
    }
  }

  mod reentrant {
    use super::*;
    use log::{LevelFilter, Log, Metadata, Record};
    use std::cell::Cell;

    static HEAP: SimHeap = SimHeap::new(HeapConfig::DEFAULT);

    thread_local! {
      static ARMED: Cell<bool> = const { Cell::new(false) };
      static NESTED: Cell<usize> = const { Cell::new(0) };
    }

    // Allocates from HEAP once per arming, on the arming thread only.
    struct AllocatingLogger;

    impl Log for AllocatingLogger {
      fn enabled(
        &self,
        _metadata: &Metadata<'_>,
      ) -> bool {
        true
      }

      fn log(
        &self,
        _record: &Record<'_>,
      ) {
        if ARMED.replace(false) {
          let nested = unsafe { HEAP.alloc(Layout::from_size_align(8, 4).unwrap()) };
          NESTED.set(nested as usize);
        }
      }

      fn flush(&self) {}
    }

    static LOGGER: AllocatingLogger = AllocatingLogger;

    #[test]
    fn test_logger_allocating_inside_alloc_gets_its_own_block() {
      log::set_logger(&LOGGER).unwrap();
      log::set_max_level(LevelFilter::Trace);

      ARMED.set(true);
      let outer = unsafe { HEAP.alloc(Layout::from_size_align(8, 4).unwrap()) } as usize;
      let nested = NESTED.get();

      assert!(!ARMED.get());
      assert_eq!(outer, 0xee00_0000);
      assert_eq!(nested, 0xee00_0008);
      assert_eq!(HEAP.cursor(), 0xee00_0010);
    }
  }
}
