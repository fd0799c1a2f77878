use std::fmt::{Display, Formatter};

use crate::atom::parse_integer;

/// Maximum number of bytes a text register holds. Longer text is silently truncated.
pub const TEXT_CAPACITY: usize = 37;

/// A fixed-capacity byte string. The stored length never exceeds `TEXT_CAPACITY`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BoundedText {
  bytes :  [u8; TEXT_CAPACITY],
  len   :  usize
}

impl BoundedText {
  /// Copies at most `TEXT_CAPACITY` bytes of `source`.
  pub fn new(source: &[u8]) -> BoundedText {
    let len = source.len().min(TEXT_CAPACITY);
    let mut bytes = [0u8; TEXT_CAPACITY];
    bytes[..len].copy_from_slice(&source[..len]);
    BoundedText { bytes, len }
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes[..self.len]
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// The stored bytes as text for display. Invalid UTF-8 is replaced.
  pub fn to_text(&self) -> String {
    String::from_utf8_lossy(self.as_bytes()).into_owned()
  }
}

impl From<&str> for BoundedText {
  fn from(text: &str) -> Self {
    BoundedText::new(text.as_bytes())
  }
}

impl Display for BoundedText {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_text())
  }
}

/// One cell of the register grid.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Register {
  Integer(i64),
  Text(BoundedText)
}

impl Default for Register {
  fn default() -> Self {
    Register::Integer(0)
  }
}

impl Register {
  pub fn text(text: &str) -> Register {
    Register::Text(BoundedText::from(text))
  }

  /// Converts a text register to an integer by its leading decimal digits. Integers are untouched.
  pub fn to_integer(&self) -> Register {
    match self {
      Register::Text(text) => Register::Integer(parse_integer(text.as_bytes())),
      integer              => *integer
    }
  }

  /// Converts an integer register to its decimal text. Text registers are untouched.
  pub fn to_text(&self) -> Register {
    match self {
      Register::Integer(value) => Register::text(&value.to_string()),
      text                     => *text
    }
  }
}

impl Display for Register {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Register::Integer(value) => write!(f, "{}", value),
      Register::Text(text)     => write!(f, "\"{}\"", text)
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncates_at_capacity(){
    let long = "x".repeat(TEXT_CAPACITY + 10);
    let text = BoundedText::from(long.as_str());
    assert_eq!(text.len(), TEXT_CAPACITY);
    assert_eq!(text.as_bytes(), &long.as_bytes()[..TEXT_CAPACITY]);

    let exact = "y".repeat(TEXT_CAPACITY);
    assert_eq!(BoundedText::from(exact.as_str()).to_text(), exact);
  }

  #[test]
  fn empty_text(){
    let text = BoundedText::new(b"");
    assert!(text.is_empty());
    assert_eq!(text.to_text(), "");
  }

  #[test]
  fn default_is_integer_zero(){
    assert_eq!(Register::default(), Register::Integer(0));
  }

  #[test]
  fn conversions(){
    assert_eq!(Register::text("42abc").to_integer(), Register::Integer(42));
    assert_eq!(Register::text("abc").to_integer(), Register::Integer(0));
    assert_eq!(Register::text("  -17").to_integer(), Register::Integer(-17));
    assert_eq!(Register::Integer(-5).to_text(), Register::text("-5"));
    // Conversions leave the other variant alone.
    assert_eq!(Register::Integer(3).to_integer(), Register::Integer(3));
    assert_eq!(Register::text("hi").to_text(), Register::text("hi"));
  }

  #[test]
  fn display(){
    assert_eq!(Register::Integer(12).to_string(), "12");
    assert_eq!(Register::text("hi").to_string(), "\"hi\"");
  }
}
