//! Error types. Lexical errors are the only failures of a program itself; the machine has no
//! runtime error path, so `MachineError` only carries failures of the host's I/O streams.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum LexErrorKind {
  #[error("unterminated string!")]
  UnterminatedString,

  #[error("non-existent character!")]
  MissingCharacter,

  #[error("non-decimal-digit in number!")]
  NonDigitInNumber,

  #[error("unterminated number!")]
  UnterminatedNumber,

  #[error("expected column number after '|'!")]
  MissingColumn,

  #[error("invalid column number!")]
  InvalidColumn,

  #[error("expected row number after '`'!")]
  MissingRow,

  #[error("invalid row number!")]
  InvalidRow,

  #[error("expected register number operator after '%'!")]
  MissingGridOperator,

  #[error("invalid register number operator!")]
  InvalidGridOperator,

  #[error("expected register index operator after '['!")]
  MissingRankOperator,

  #[error("invalid register index operator!")]
  InvalidRankOperator,

  #[error("expected jump stack operator after 'j'!")]
  MissingJumpOperator,

  #[error("invalid jump stack operator!")]
  InvalidJumpOperator,

  #[error("expected '|' after '?'!")]
  MissingOrBar,

  #[error("invalid boolean operator!")]
  InvalidBooleanOperator,

  /// Carries the offending character for callers; the message does not show it.
  #[error("unknown character!")]
  UnknownCharacter(char),
}

/// A lexical error and the 1-based line it was found on.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("[{line}] err: {kind}")]
pub struct LexError {
  pub line : u32,
  pub kind : LexErrorKind
}

impl LexError {
  pub fn new(line: u32, kind: LexErrorKind) -> LexError {
    LexError { line, kind }
  }
}

#[derive(Error, Debug)]
pub enum MachineError {
  #[error("i/o failure: {0}")]
  Io(#[from] std::io::Error),
}

/// Any failure of `interpret`: a program that does not lex, or a broken I/O stream.
#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Lex(#[from] LexError),

  #[error(transparent)]
  Machine(#[from] MachineError),
}
