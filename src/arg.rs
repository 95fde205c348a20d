use core::ffi::CStr;

/// Width of the integer a directive reads, selected by its length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Length {
  /// No modifier: `int`.
  #[default]
  Int,
  /// `l`: `long`.
  Long,
  /// `ll` (or more `l`s): `long long`.
  LongLong,
}

impl Length {
  /// Bits read for this length on the ILP32 target, where `long` is as wide
  /// as `int`.
  pub const fn bits(self) -> u32 {
    match self {
      Length::Int | Length::Long => 32,
      Length::LongLong => 64,
    }
  }

  pub(crate) const fn from_count(count: usize) -> Self {
    match count {
      0 => Length::Int,
      1 => Length::Long,
      _ => Length::LongLong,
    }
  }
}

/// One typed formatting argument.
///
/// Integers keep their full value; the directive's length modifier decides
/// how many low bits are read, the same way a `va_arg` of that type would.
///
/// Build these with `From`, usually through the [`printf!`] or [`snprintf!`]
/// macros.
///
/// [`printf!`]: crate::printf!
/// [`snprintf!`]: crate::snprintf!
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
  Char(u8),
  Int(i64),
  Uint(u64),
  /// Copied up to the first NUL byte or the end of the slice.
  Str(&'a [u8]),
}

impl Arg<'_> {
  /// Reads the argument as a signed integer of the given length.
  pub fn signed(
    &self,
    length: Length,
  ) -> Option<i64> {
    let raw = self.raw()?;

    Some(match length.bits() {
      32 => raw as i32 as i64,
      _ => raw as i64,
    })
  }

  /// Reads the argument as an unsigned integer of the given length.
  pub fn unsigned(
    &self,
    length: Length,
  ) -> Option<u64> {
    let raw = self.raw()?;

    Some(match length.bits() {
      32 => raw as u32 as u64,
      _ => raw,
    })
  }

  /// The byte a `%c` directive prints.
  pub fn char(&self) -> Option<u8> {
    match *self {
      Arg::Char(c) => Some(c),
      Arg::Int(v) => Some(v as u8),
      Arg::Uint(v) => Some(v as u8),
      Arg::Str(_) => None,
    }
  }

  /// The bytes a `%s` directive prints, cut at the first NUL.
  pub fn bytes(&self) -> Option<&[u8]> {
    match *self {
      Arg::Str(s) => {
        let end = s.iter().position(|&b| b == 0).unwrap_or(s.len());
        Some(&s[..end])
      }
      _ => None,
    }
  }

  // Two's-complement bit pattern, before truncation to the read width.
  fn raw(&self) -> Option<u64> {
    match *self {
      Arg::Char(c) => Some(c as u64),
      Arg::Int(v) => Some(v as u64),
      Arg::Uint(v) => Some(v),
      Arg::Str(_) => None,
    }
  }

  pub(crate) const fn kind(&self) -> &'static str {
    match self {
      Arg::Char(_) => "char",
      Arg::Int(_) => "signed integer",
      Arg::Uint(_) => "unsigned integer",
      Arg::Str(_) => "string",
    }
  }
}

macro_rules! impl_from_int {
  ($variant:ident as $wide:ty: $($ty:ty),+) => {
    $(
      impl From<$ty> for Arg<'_> {
        fn from(value: $ty) -> Self {
          Arg::$variant(value as $wide)
        }
      }
    )+
  };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(Uint as u64: u8, u16, u32, u64, usize);

impl From<char> for Arg<'_> {
  /// Characters outside Latin-1 have no single-byte form and print as `?`.
  fn from(value: char) -> Self {
    Arg::Char(u8::try_from(value).unwrap_or(b'?'))
  }
}

impl<'a> From<&'a str> for Arg<'a> {
  fn from(value: &'a str) -> Self {
    Arg::Str(value.as_bytes())
  }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
  fn from(value: &'a [u8]) -> Self {
    Arg::Str(value)
  }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
  fn from(value: &'a [u8; N]) -> Self {
    Arg::Str(value)
  }
}

impl<'a> From<&'a CStr> for Arg<'a> {
  fn from(value: &'a CStr) -> Self {
    Arg::Str(value.to_bytes())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_length_from_modifier_count() {
    assert_eq!(Length::from_count(0), Length::Int);
    assert_eq!(Length::from_count(1), Length::Long);
    assert_eq!(Length::from_count(2), Length::LongLong);
    assert_eq!(Length::from_count(3), Length::LongLong);
    assert_eq!(Length::Long.bits(), 32);
  }

  #[test]
  fn test_int_reads_truncate_to_32_bits() {
    let arg = Arg::from(0x1_0000_0005i64);

    assert_eq!(arg.signed(Length::Int), Some(5));
    assert_eq!(arg.signed(Length::LongLong), Some(0x1_0000_0005));
    assert_eq!(Arg::from(0xffff_ffffu32).signed(Length::Int), Some(-1));
  }

  #[test]
  fn test_negative_reads_as_unsigned() {
    assert_eq!(Arg::from(-1).unsigned(Length::Int), Some(0xffff_ffff));
    assert_eq!(Arg::from(-1).unsigned(Length::LongLong), Some(u64::MAX));
    assert_eq!(Arg::from(-1i8).signed(Length::LongLong), Some(-1));
  }

  #[test]
  fn test_char_conversions() {
    assert_eq!(Arg::from('A'), Arg::Char(b'A'));
    assert_eq!(Arg::from('€'), Arg::Char(b'?'));
    assert_eq!(Arg::from(0x141).char(), Some(b'A'));
    assert_eq!(Arg::Char(b'z').unsigned(Length::Int), Some(122));
    assert_eq!(Arg::from("x").char(), None);
  }

  #[test]
  fn test_string_stops_at_nul() {
    assert_eq!(Arg::from(b"ab\0cd").bytes(), Some(&b"ab"[..]));
    assert_eq!(Arg::from(c"hello").bytes(), Some(&b"hello"[..]));
    assert_eq!(Arg::from("plain").bytes(), Some(&b"plain"[..]));
    assert_eq!(Arg::from(7).bytes(), None);
    assert_eq!(Arg::from("7").signed(Length::Int), None);
  }
}
