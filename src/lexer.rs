/*!
  The lexer turns source text into the flat instruction stream the machine executes.

  Every instruction is one character or a short character group. Literals are introduced by a
  marker character (`"`, `'`, `$`), grid toggles by a hex digit or a `|`/`` ` `` followed by a
  column/row number, and the remaining operators are looked up in the `InstructionKind` glyph
  table. The whole source is lexed up front; the result is either the complete program or the
  first error.
*/

use std::str::FromStr;

use tracing::debug;

use crate::chariter::CharIter;
use crate::error::{LexError, LexErrorKind};
use crate::instruction::InstructionKind;
use crate::token::Token;

pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
  let mut chars  = CharIter::new(source);
  let mut tokens = Vec::new();

  loop {
    chars.trim_left();
    let line = chars.line();
    let c = match chars.next() {
      Some(c) => c,
      None    => break
    };

    let token = match c {

      '"'  => lex_string(&mut chars, line)?,

      '\'' => lex_char(&mut chars, line)?,

      '$'  => lex_number(&mut chars, line)?,

      '|'  => {
        let kind = lex_grid_line(
          &mut chars, line, InstructionKind::toggle_column,
          LexErrorKind::MissingColumn, LexErrorKind::InvalidColumn
        )?;
        Token::bare(kind, line)
      }

      '`'  => {
        let kind = lex_grid_line(
          &mut chars, line, InstructionKind::toggle_row,
          LexErrorKind::MissingRow, LexErrorKind::InvalidRow
        )?;
        Token::bare(kind, line)
      }

      '0'..='9' | 'a'..='f' => {
        match c.to_digit(16).and_then(InstructionKind::toggle_bit) {
          Some(kind) => Token::bare(kind, line),
          None       => return Err(LexError::new(line, LexErrorKind::UnknownCharacter(c)))
        }
      }

      '%'  => lex_operator(
        &mut chars, line, c, LexErrorKind::MissingGridOperator, LexErrorKind::InvalidGridOperator
      )?,

      '['  => lex_operator(
        &mut chars, line, c, LexErrorKind::MissingRankOperator, LexErrorKind::InvalidRankOperator
      )?,

      'j'  => lex_operator(
        &mut chars, line, c, LexErrorKind::MissingJumpOperator, LexErrorKind::InvalidJumpOperator
      )?,

      '?'  => lex_operator(
        &mut chars, line, c, LexErrorKind::MissingOrBar, LexErrorKind::InvalidBooleanOperator
      )?,

      _ => {
        match InstructionKind::from_str(c.encode_utf8(&mut [0u8; 4])) {
          Ok(kind) => Token::bare(kind, line),
          Err(_e)  => return Err(LexError::new(line, LexErrorKind::UnknownCharacter(c)))
        }
      }

    }; // end match on first character

    tokens.push(token);
  } // end loop

  debug!(instructions = tokens.len(), lines = chars.line(), "lexed program");
  Ok(tokens)
}

/// Lexes the body of a string literal after its opening quote. Errors report the opening line.
fn lex_string(chars: &mut CharIter, line: u32) -> Result<Token, LexError> {
  let payload = chars.get_prefix_match(|c| c != '"');
  match chars.next() {
    Some('"') => Ok(Token::new(InstructionKind::StringLiteral, &payload, line)),
    _         => Err(LexError::new(line, LexErrorKind::UnterminatedString))
  }
}

/// Lexes the single character following `'`, which may be whitespace.
fn lex_char(chars: &mut CharIter, line: u32) -> Result<Token, LexError> {
  match chars.next() {
    Some(c) => Ok(Token::new(InstructionKind::CharLiteral, c.encode_utf8(&mut [0u8; 4]), line)),
    None    => Err(LexError::new(line, LexErrorKind::MissingCharacter))
  }
}

/// Lexes the digits of a number literal up to the closing `$`. An empty literal is allowed.
fn lex_number(chars: &mut CharIter, line: u32) -> Result<Token, LexError> {
  let digits = chars.get_prefix_match(|c| c.is_ascii_digit());
  match chars.next() {
    Some('$') => Ok(Token::new(InstructionKind::NumberLiteral, &digits, line)),
    Some(_c)  => Err(LexError::new(line, LexErrorKind::NonDigitInNumber)),
    None      => Err(LexError::new(line, LexErrorKind::UnterminatedNumber))
  }
}

/// Lexes a two-character operator whose first character, `prefix`, has already been consumed.
fn lex_operator(
  chars   :  &mut CharIter,
  line    :  u32,
  prefix  :  char,
  missing :  LexErrorKind,
  invalid :  LexErrorKind
) -> Result<Token, LexError> {
  let second = match chars.next() {
    Some(second) => second,
    None         => return Err(LexError::new(line, missing))
  };
  match InstructionKind::from_str(&format!("{}{}", prefix, second)) {
    Ok(kind) => Ok(Token::bare(kind, line)),
    Err(_e)  => Err(LexError::new(line, invalid))
  }
}

/// Lexes the column or row number following `|` or `` ` ``.
fn lex_grid_line(
  chars   :  &mut CharIter,
  line    :  u32,
  kind_of :  fn(u32) -> Option<InstructionKind>,
  missing :  LexErrorKind,
  invalid :  LexErrorKind
) -> Result<InstructionKind, LexError> {
  match chars.next() {
    Some(c) => {
      c.to_digit(10)
       .and_then(kind_of)
       .ok_or(LexError::new(line, invalid))
    }
    None    => Err(LexError::new(line, missing))
  }
}
