//! `printf`-style formatting over typed arguments.
//!
//! Recognised directives: `%%`, `%c`, `%s` and
//! `%[+| ][0][width][l|ll](d|u|x|o)`. Flags, width and length modifiers only
//! apply to the numeric conversions; `%5s` is not a string directive.
//!
//! A directive whose conversion character is not recognised is skipped: it
//! consumes the characters parsed so far and no argument, and prints nothing.
//! This leniency is kept on purpose; there is no error channel.

use log::debug;

use crate::{
  arg::{Arg, Length},
  sink::CharSink,
};

// Widest rendering: 22 octal digits of a 64-bit value plus a sign.
const DIGITS_LEN: usize = 23;

/// Formats `format` with `args`, pushing every character through `sink`.
///
/// Returns the number of characters produced. Formatting stops at the end of
/// `format` or at its first NUL byte.
pub fn format_to_stream<S, F>(
  sink: &mut S,
  format: F,
  args: &[Arg<'_>],
) -> usize
where
  S: CharSink + ?Sized,
  F: AsRef<[u8]>,
{
  Printer::new(Stream { sink }, format.as_ref(), args).run()
}

/// Formats `format` with `args` into `buffer`, `snprintf` style.
///
/// The buffer's length is the maximum output length. Characters beyond it
/// are counted but dropped, so the return value is the length the output
/// would have had. A non-empty buffer always ends up NUL-terminated: the
/// last byte is forced to `0`. When the output is shorter than the buffer, a
/// `0` is also written right after it, so `buffer` holds a C string even
/// then; a plain `snprintf` that only forces the last byte would leave that
/// byte as it was. Bytes between the two terminators are not touched. An
/// empty buffer is never touched.
pub fn format_to_buffer<F>(
  buffer: &mut [u8],
  format: F,
  args: &[Arg<'_>],
) -> usize
where
  F: AsRef<[u8]>,
{
  Printer::new(Buffer { buffer }, format.as_ref(), args).run()
}

/// Formats to a [`CharSink`], building the argument list from the trailing
/// expressions.
///
/// ```rust
/// let mut out = Vec::new();
/// let n = simrt::printf!(&mut |c: u8| out.push(c), "%s=%05d", "x", -7);
///
/// assert_eq!(out, b"x=-0007");
/// assert_eq!(n, 7);
/// ```
#[macro_export]
macro_rules! printf {
  ($sink:expr, $format:expr $(, $arg:expr)* $(,)?) => {
    $crate::format_to_stream($sink, $format, &[$($crate::Arg::from($arg)),*])
  };
}

/// Formats into a byte buffer, building the argument list from the trailing
/// expressions.
///
/// ```rust
/// let mut buf = [0xffu8; 4];
/// let n = simrt::snprintf!(&mut buf, "%s", "abcdef");
///
/// assert_eq!(&buf, b"abc\0");
/// assert_eq!(n, 6);
/// ```
#[macro_export]
macro_rules! snprintf {
  ($buffer:expr, $format:expr $(, $arg:expr)* $(,)?) => {
    $crate::format_to_buffer($buffer, $format, &[$($crate::Arg::from($arg)),*])
  };
}

trait Output {
  /// Stores the character at output position `index`.
  fn write(
    &mut self,
    index: usize,
    c: u8,
  );

  /// Called once, after the last character, with the total length.
  fn finish(
    &mut self,
    _len: usize,
  ) {
  }
}

struct Stream<'s, S: ?Sized> {
  sink: &'s mut S,
}

impl<S: CharSink + ?Sized> Output for Stream<'_, S> {
  fn write(
    &mut self,
    _index: usize,
    c: u8,
  ) {
    self.sink.put(c);
  }
}

struct Buffer<'b> {
  buffer: &'b mut [u8],
}

impl Output for Buffer<'_> {
  fn write(
    &mut self,
    index: usize,
    c: u8,
  ) {
    if let Some(slot) = self.buffer.get_mut(index) {
      *slot = c;
    }
  }

  fn finish(
    &mut self,
    len: usize,
  ) {
    if let Some(slot) = self.buffer.get_mut(len) {
      *slot = 0;
    }
    if let Some(last) = self.buffer.last_mut() {
      *last = 0;
    }
  }
}

/// Flags, width and length of one numeric directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Directive {
  sign: Option<u8>,
  pad: u8,
  width: usize,
  length: Length,
}

impl Default for Directive {
  fn default() -> Self {
    Self {
      sign: None,
      pad: b' ',
      width: 0,
      length: Length::Int,
    }
  }
}

struct Printer<'f, 'a, O> {
  out: O,
  format: &'f [u8],
  pos: usize,
  args: core::slice::Iter<'a, Arg<'a>>,
  len: usize,
}

impl<'f, 'a, O: Output> Printer<'f, 'a, O> {
  fn new(
    out: O,
    format: &'f [u8],
    args: &'a [Arg<'a>],
  ) -> Self {
    Self {
      out,
      format,
      pos: 0,
      args: args.iter(),
      len: 0,
    }
  }

  fn run(mut self) -> usize {
    while let Some(c) = self.next_byte() {
      if c != b'%' {
        self.emit(c);
        continue;
      }

      match self.next_byte() {
        Some(b'%') => self.emit(b'%'),
        Some(b'c') => self.char(),
        Some(b's') => self.string(),
        Some(c) => self.number(c),
        // A lone '%' at the end prints nothing.
        None => break,
      }
    }

    self.out.finish(self.len);
    self.len
  }

  fn next_byte(&mut self) -> Option<u8> {
    match self.format.get(self.pos) {
      Some(&c) if c != 0 => {
        self.pos += 1;
        Some(c)
      }
      _ => None,
    }
  }

  fn emit(
    &mut self,
    c: u8,
  ) {
    self.out.write(self.len, c);
    self.len += 1;
  }

  fn next_arg(
    &mut self,
    conversion: u8,
  ) -> Option<Arg<'a>> {
    let arg = self.args.next().copied();
    if arg.is_none() {
      debug!("missing argument for %{}", conversion as char);
    }
    arg
  }

  fn mismatch(
    conversion: u8,
    arg: &Arg<'_>,
  ) {
    debug!(
      "%{} cannot print a {} argument",
      conversion as char,
      arg.kind()
    );
  }

  fn char(&mut self) {
    let Some(arg) = self.next_arg(b'c') else {
      return;
    };

    match arg.char() {
      Some(c) => self.emit(c),
      None => Self::mismatch(b'c', &arg),
    }
  }

  fn string(&mut self) {
    let Some(arg) = self.next_arg(b's') else {
      return;
    };

    match arg.bytes() {
      Some(bytes) => {
        for &c in bytes {
          self.emit(c);
        }
      }
      None => Self::mismatch(b's', &arg),
    }
  }

  // Parses flags, width and length starting at `first`, then prints the
  // argument if the conversion is one of d, u, x, o.
  fn number(
    &mut self,
    first: u8,
  ) {
    let mut directive = Directive::default();
    let mut c = Some(first);

    if let Some(sign @ (b'+' | b' ')) = c {
      directive.sign = Some(sign);
      c = self.next_byte();
    }

    if c == Some(b'0') {
      directive.pad = b'0';
      c = self.next_byte();
    }

    while let Some(digit @ b'0'..=b'9') = c {
      directive.width = directive
        .width
        .saturating_mul(10)
        .saturating_add(usize::from(digit - b'0'));
      c = self.next_byte();
    }

    let mut ells = 0;
    while c == Some(b'l') {
      ells += 1;
      c = self.next_byte();
    }
    directive.length = Length::from_count(ells);

    let Some(conversion) = c else {
      return;
    };

    let radix = match conversion {
      b'd' | b'u' => 10,
      b'x' => 16,
      b'o' => 8,
      _ => {
        debug!("ignoring unknown conversion %{}", conversion as char);
        return;
      }
    };

    let Some(arg) = self.next_arg(conversion) else {
      return;
    };

    let value = if conversion == b'd' {
      match arg.signed(directive.length) {
        Some(v) if v < 0 => {
          self.negative(&mut directive);
          Some(v.unsigned_abs())
        }
        other => other.map(|v| v as u64),
      }
    } else {
      arg.unsigned(directive.length)
    };

    match value {
      Some(value) => self.digits(value, radix, directive),
      None => Self::mismatch(conversion, &arg),
    }
  }

  fn negative(
    &mut self,
    directive: &mut Directive,
  ) {
    if directive.pad == b'0' {
      // The sign goes in front of the zeros: "-0005", never "000-5".
      self.emit(b'-');
      directive.width = directive.width.saturating_sub(1);
      directive.sign = None;
    } else {
      directive.sign = Some(b'-');
    }
  }

  fn digits(
    &mut self,
    mut value: u64,
    radix: u64,
    directive: Directive,
  ) {
    let mut buf = [0u8; DIGITS_LEN];
    let mut i = 0;

    loop {
      let digit = (value % radix) as u8;
      value /= radix;
      buf[i] = if digit >= 10 {
        b'a' + digit - 10
      } else {
        b'0' + digit
      };
      i += 1;
      if value == 0 {
        break;
      }
    }

    if let Some(sign) = directive.sign {
      buf[i] = sign;
      i += 1;
    }

    let mut width = directive.width;
    while width > i {
      self.emit(directive.pad);
      width -= 1;
    }

    while i > 0 {
      i -= 1;
      self.emit(buf[i]);
    }
  }
}
