//! Host memory backing a heap window.
//!
//! On the simulator the heap window is plain physical memory. On a host the
//! same allocator can be pointed at an anonymous mapping so the addresses it
//! hands out are actually usable.

use core::ptr::{self, NonNull};

use crate::{
  align::{WORD_SIZE, align_up},
  config::HeapConfig,
  error::RegionError,
};

/// Anonymous read/write mapping, unmapped on drop.
#[derive(Debug)]
pub struct HostRegion {
  base: NonNull<u8>,
  config: HeapConfig,
}

impl HostRegion {
  /// Maps at least `size` bytes, rounded up to a whole word.
  pub fn map(size: usize) -> Result<Self, RegionError> {
    if size == 0 {
      return Err(RegionError::Empty);
    }

    let len = align_up(size, WORD_SIZE).ok_or(RegionError::Map(libc::ENOMEM))?;

    let address = unsafe {
      libc::mmap(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if address == libc::MAP_FAILED {
      return Err(RegionError::Map(errno()));
    }

    let Some(base) = NonNull::new(address.cast::<u8>()) else {
      return Err(RegionError::Map(libc::ENOMEM));
    };

    match HeapConfig::new(base.as_ptr() as usize, len) {
      Ok(config) => Ok(Self { base, config }),
      Err(err) => {
        unsafe { libc::munmap(address, len) };
        Err(err.into())
      }
    }
  }

  /// Window covering exactly the mapping.
  pub const fn config(&self) -> HeapConfig {
    self.config
  }

  pub const fn as_ptr(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  pub const fn size(&self) -> usize {
    self.config.size()
  }
}

impl Drop for HostRegion {
  fn drop(&mut self) {
    unsafe {
      libc::munmap(self.base.as_ptr().cast(), self.config.size());
    }
  }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn errno() -> i32 {
  unsafe { *libc::__errno_location() }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn errno() -> i32 {
  unsafe { *libc::__error() }
}

#[cfg(not(any(
  target_os = "linux",
  target_os = "android",
  target_os = "macos",
  target_os = "ios",
  target_os = "freebsd"
)))]
fn errno() -> i32 {
  0
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::BumpAllocator;

  #[test]
  fn test_map_rounds_to_word() {
    let region = HostRegion::map(10).unwrap();

    assert_eq!(region.size(), 12);
    assert_eq!(region.config().base(), region.as_ptr() as usize);
  }

  #[test]
  fn test_empty_region_is_rejected() {
    assert_eq!(HostRegion::map(0).unwrap_err(), RegionError::Empty);
  }

  #[test]
  fn test_allocations_are_usable() {
    let region = HostRegion::map(4096).unwrap();
    let mut allocator = BumpAllocator::new(region.config());

    let first = allocator.allocate(size_of::<u32>()).unwrap() as *mut u32;
    let second = allocator.allocate(6).unwrap() as *mut u16;

    unsafe {
      first.write(0xdead_beef);
      for i in 0..3 {
        second.add(i).write(i as u16 + 1);
      }

      assert_eq!(first.read(), 0xdead_beef);
      assert_eq!(second.add(2).read(), 3);
    }

    assert!(region.config().contains(second as usize));
  }
}
