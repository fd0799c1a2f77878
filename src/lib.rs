/*!
  An interpreter for a character-level esoteric language whose instructions operate on a 4×4
  grid of registers.

  The pipeline is this:
  ```text
  text -> [`lexer::lex`] -> `Token`s -> [`Machine::run`] -> output
  ```
  Each source character (or short character group) lexes to exactly one instruction, and the
  machine executes the instruction stream directly: literals push themselves onto the atom stack,
  toggles edit the selection mask, and every other operator acts on the selected registers in the
  current traversal order.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

use std::io::{BufRead, Write};

use prettytable::format as TableFormat;

pub mod atom;
pub mod chariter;
pub mod error;
pub mod instruction;
pub mod lexer;
pub mod machine;
pub mod register;
pub mod selection;
pub mod token;

pub use error::{Error, LexError, LexErrorKind, MachineError};
pub use lexer::lex;
pub use machine::Machine;
pub use token::Token;

lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// Lexes `source` and runs it on a fresh machine, returning the machine's final state.
pub fn interpret<R, W>(source: &str, input: &mut R, output: &mut W) -> Result<Machine, Error>
  where R: BufRead,
        W: Write
{
  let program = lex(source)?;
  let mut machine = Machine::new();
  machine.run(&program, input, output)?;
  Ok(machine)
}
