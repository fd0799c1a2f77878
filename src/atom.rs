/*!
  Atoms are the transient values on the machine's operand stack. Literal instructions push them,
  and `push-atom`, `and` and `or` synthesize them from register contents.

  String atoms hold raw bytes, exactly as a text register stores them, so moving text between
  registers and the stack never re-encodes it.

  Operators that need a scalar read any atom's bytes the way C's `atoi` does: leading whitespace,
  an optional sign, then decimal digits. Text that does not start that way reads as 0.
*/

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use nom::{
  character::complete::{digit1, multispace0, one_of},
  combinator::{opt, recognize},
  sequence::{pair, preceded},
  IResult
};

use crate::instruction::InstructionKind;
use crate::register::{BoundedText, Register};
use crate::token::Token;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Atom {
  Str(Vec<u8>),
  Char(char),
  /// Decimal text, kept as written so that scalar reads behave like the literal did.
  Number(String)
}

impl Atom {
  /// The atom a literal token pushes, or `None` for non-literal tokens.
  pub fn from_token(token: &Token) -> Option<Atom> {
    match token.kind {
      InstructionKind::StringLiteral => Some(Atom::Str(token.payload.as_bytes().to_vec())),
      InstructionKind::CharLiteral   => token.payload.chars().next().map(Atom::Char),
      InstructionKind::NumberLiteral => Some(Atom::Number(token.payload.clone())),
      _                              => None
    }
  }

  pub fn from_bool(value: bool) -> Atom {
    match value {
      true  => Atom::Number("1".to_string()),
      false => Atom::Number("0".to_string())
    }
  }

  pub fn bytes(&self) -> Cow<'_, [u8]> {
    match self {
      Atom::Str(bytes)    => Cow::Borrowed(bytes.as_slice()),
      Atom::Number(text)  => Cow::Borrowed(text.as_bytes()),
      Atom::Char(c)       => Cow::Owned(c.to_string().into_bytes())
    }
  }

  /// Reads the atom's text as an integer operand.
  pub fn scalar(&self) -> i64 {
    parse_integer(&self.bytes())
  }

  /// The value `pop-atom` stores into every selected register.
  pub fn to_register(&self) -> Register {
    match self {
      Atom::Str(bytes)   => Register::Text(BoundedText::new(bytes)),
      Atom::Char(c)      => Register::Integer(*c as i64),
      Atom::Number(text) => Register::Integer(parse_integer(text.as_bytes()))
    }
  }
}

impl From<&Register> for Atom {
  fn from(register: &Register) -> Self {
    match register {
      Register::Integer(value) => Atom::Number(value.to_string()),
      Register::Text(text)     => Atom::Str(text.as_bytes().to_vec())
    }
  }
}

impl Display for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Atom::Str(bytes)   => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
      Atom::Char(c)      => write!(f, "'{}", c.escape_debug()),
      Atom::Number(text) => write!(f, "${}$", text)
    }
  }
}

fn signed_digits(input: &[u8]) -> IResult<&[u8], &[u8]> {
  preceded(multispace0, recognize(pair(opt(one_of("+-")), digit1)))(input)
}

/// Parses the leading decimal integer of `text`, or 0 if there is none. Out-of-range values saturate.
pub fn parse_integer(text: &[u8]) -> i64 {
  match signed_digits(text) {
    Ok((_rest, digits)) => {
      let saturated = match digits.starts_with(b"-") {
        true  => i64::MIN,
        false => i64::MAX
      };
      std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| digits.parse::<i64>().ok())
        .unwrap_or(saturated)
    }
    Err(_e) => 0
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn atoi_rules(){
    assert_eq!(parse_integer(b"42"), 42);
    assert_eq!(parse_integer(b"  42xyz"), 42);
    assert_eq!(parse_integer(b"-8"), -8);
    assert_eq!(parse_integer(b"+8"), 8);
    assert_eq!(parse_integer(b""), 0);
    assert_eq!(parse_integer(b"abc"), 0);
    assert_eq!(parse_integer(b"-"), 0);
    assert_eq!(parse_integer(b"x12"), 0);
  }

  #[test]
  fn saturates(){
    assert_eq!(parse_integer(b"99999999999999999999999"), i64::MAX);
    assert_eq!(parse_integer(b"-99999999999999999999999"), i64::MIN);
  }

  #[test]
  fn from_literal_tokens(){
    let string = Token::new(InstructionKind::StringLiteral, "hi", 1);
    let character = Token::new(InstructionKind::CharLiteral, "x", 1);
    let number = Token::new(InstructionKind::NumberLiteral, "17", 1);
    let operator = Token::new(InstructionKind::Add, "", 1);

    assert_eq!(Atom::from_token(&string), Some(Atom::Str(b"hi".to_vec())));
    assert_eq!(Atom::from_token(&character), Some(Atom::Char('x')));
    assert_eq!(Atom::from_token(&number), Some(Atom::Number("17".to_string())));
    assert_eq!(Atom::from_token(&operator), None);
  }

  #[test]
  fn scalar_reads_text(){
    // A character atom is read through its text, not its code.
    assert_eq!(Atom::Char('7').scalar(), 7);
    assert_eq!(Atom::Char('a').scalar(), 0);
    assert_eq!(Atom::Str(b"12 apples".to_vec()).scalar(), 12);
  }

  #[test]
  fn to_register(){
    assert_eq!(Atom::Char('A').to_register(), Register::Integer(65));
    assert_eq!(Atom::Number("-3".to_string()).to_register(), Register::Integer(-3));
    assert_eq!(Atom::Str(b"ok".to_vec()).to_register(), Register::text("ok"));
  }

  #[test]
  fn from_register(){
    assert_eq!(Atom::from(&Register::Integer(-9)), Atom::Number("-9".to_string()));
    assert_eq!(Atom::from(&Register::text("abc")), Atom::Str(b"abc".to_vec()));
  }

  #[test]
  fn text_registers_round_trip_as_bytes(){
    // A character cut by truncation leaves bytes that are not UTF-8.
    let bytes = [b'a', b'b', 0xC3];
    let register = Register::Text(BoundedText::new(&bytes));
    let atom = Atom::from(&register);
    assert_eq!(atom, Atom::Str(bytes.to_vec()));
    assert_eq!(atom.to_register(), register);
  }
}
