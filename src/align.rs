/// Size of a machine word on the simulated target, in bytes.
pub const WORD_SIZE: usize = 4;

/// Rounds a value up to the target word size, or to an explicit power of two.
///
/// The value must not be within `to - 1` of `usize::MAX`; use [`align_up`]
/// when the input is not known to be small.
///
/// # Examples
///
/// ```rust
/// use simrt::align;
///
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(12), 12);
/// assert_eq!(align!(9, 8), 16);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align!($value, $crate::align::WORD_SIZE)
  };
  ($value:expr, $to:expr) => {
    (($value) + ($to) - 1) & !(($to) - 1)
  };
}

/// Rounds `value` up to a multiple of `to`, which must be a power of two.
///
/// Returns `None` when the rounded value does not fit in a `usize`.
pub const fn align_up(
  value: usize,
  to: usize,
) -> Option<usize> {
  debug_assert!(to.is_power_of_two());

  match value.checked_add(to - 1) {
    Some(bumped) => Some(bumped & !(to - 1)),
    None => None,
  }
}

/// Whether `value` is a multiple of `to`, which must be a power of two.
pub const fn is_aligned(
  value: usize,
  to: usize,
) -> bool {
  value & (to - 1) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align() {
    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (WORD_SIZE * i + 1)..=(WORD_SIZE * (i + 1));

      let expected_alignment = WORD_SIZE * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(expected, align!(size));
        assert_eq!(Some(expected), align_up(size, WORD_SIZE));
      }
    }
  }

  #[test]
  fn test_align_to_larger_power() {
    assert_eq!(align!(0, 16), 0);
    assert_eq!(align!(1, 16), 16);
    assert_eq!(align!(17, 16), 32);
    assert_eq!(align_up(0xee00_0001, 8), Some(0xee00_0008));
  }

  #[test]
  fn test_align_up_overflow() {
    assert_eq!(align_up(usize::MAX, WORD_SIZE), None);
    assert_eq!(align_up(usize::MAX - 2, WORD_SIZE), None);
    assert_eq!(align_up(usize::MAX - 3, WORD_SIZE), Some(usize::MAX - 3));
  }

  #[test]
  fn test_is_aligned() {
    assert!(is_aligned(0xee00_0000, WORD_SIZE));
    assert!(!is_aligned(0xee00_0002, WORD_SIZE));
  }
}
