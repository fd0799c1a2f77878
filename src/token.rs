/*!
  A `Token` is one instruction of the lexed program. The lexer emits tokens in source order and
  the machine executes them directly; there is no further compilation step.
*/

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::instruction::InstructionKind;
use crate::TABLE_DISPLAY_FORMAT;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
  pub kind    :  InstructionKind,
  /// Literal text; empty for everything but literals.
  pub payload :  String,
  /// 1-based source line, used only for diagnostics.
  pub line    :  u32
}

impl Token {
  pub fn new(kind: InstructionKind, payload: &str, line: u32) -> Token {
    Token {
      kind,
      payload: payload.to_string(),
      line
    }
  }

  /// A token without payload.
  pub fn bare(kind: InstructionKind, line: u32) -> Token {
    Token {
      kind,
      payload: String::new(),
      line
    }
  }
}

impl Display for Token {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.kind {
      InstructionKind::StringLiteral => write!(f, "{}(\"{}\")", self.kind, self.payload.escape_debug()),
      InstructionKind::CharLiteral   => write!(f, "{}('{}')", self.kind, self.payload.escape_debug()),
      InstructionKind::NumberLiteral => write!(f, "{}({})", self.kind, self.payload),
      _                              => write!(f, "{}", self.kind)
    }
  }
}

/// Renders a program as a table of instruction pointer, source line and instruction.
pub fn instruction_table(tokens: &[Token], highlight: Option<usize>) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Pointer", ubr->"Line", ubl->"Instruction"]);

  for (i, token) in tokens.iter().enumerate() {
    match Some(i) == highlight {

      true  => {
        table.add_row(row![r->format!("* --> {}", i), r->token.line, token]);
      }

      false => {
        table.add_row(row![r->i, r->token.line, token]);
      }

    } // end match on highlight
  } // end for
  table
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_literals(){
    assert_eq!(Token::new(InstructionKind::StringLiteral, "a\"b", 1).to_string(), "StringLiteral(\"a\\\"b\")");
    assert_eq!(Token::new(InstructionKind::CharLiteral, "\n", 1).to_string(), "CharLiteral('\\n')");
    assert_eq!(Token::new(InstructionKind::NumberLiteral, "12", 1).to_string(), "NumberLiteral(12)");
    assert_eq!(Token::bare(InstructionKind::GridAdd, 3).to_string(), "GridAdd");
  }

  #[test]
  fn table_has_a_row_per_token(){
    let tokens = vec![
      Token::bare(InstructionKind::ToggleBit0, 1),
      Token::bare(InstructionKind::Write, 2),
    ];
    let table = instruction_table(&tokens, Some(1));
    assert_eq!(table.len(), 2);
    assert!(table.to_string().contains("* --> 1"));
  }
}
