/*!
  Instruction kinds of the machine.

  Every instruction the lexer can produce is one variant of `InstructionKind`. As in C, enum
  values are represented by consecutive natural numbers and can be treated as numeric types, so
  the variants are grouped by category and a kind's category is determined with a trivial
  comparison of its code. Consequently, the order the variants are listed below is significant.
  Order-dependencies:
      ```
      InstructionKind::is_literal()
      InstructionKind::toggle_mask()
      InstructionKind::toggle_bit() / toggle_column() / toggle_row()
      ```

  The source glyph of each fixed instruction is given as a `strum` serialization, which makes
  `InstructionKind::from_str` the lexer's operator table. The `to_string` name is what
  `Display` shows.
*/

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

use crate::selection::{COLUMN_MASK, FULL_MASK, GRID_SIDE, ROW_MASK};

#[derive(
  StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum InstructionKind {
  // Literals //
  StringLiteral,     // "..."
  CharLiteral,       // 'c
  NumberLiteral,     // $...$
  // Code 3

  // Register mask toggles //
  ToggleBit0,
  ToggleBit1,
  ToggleBit2,
  ToggleBit3,
  ToggleBit4,
  ToggleBit5,
  ToggleBit6,
  ToggleBit7,
  ToggleBit8,
  ToggleBit9,
  ToggleBitA,
  ToggleBitB,
  ToggleBitC,
  ToggleBitD,
  ToggleBitE,
  ToggleBitF,
  ToggleColumn0,     // |0
  ToggleColumn1,
  ToggleColumn2,
  ToggleColumn3,
  ToggleRow0,        // `0
  ToggleRow1,
  ToggleRow2,
  ToggleRow3,
  #[strum(to_string = "ToggleMatrix", serialize = "A")]
  ToggleMatrix,
  // Code 28

  // Traversal mode //
  #[strum(to_string = "ModeColumn", serialize = "C")]
  ModeColumn,
  #[strum(to_string = "ModeRow", serialize = "R")]
  ModeRow,
  #[strum(to_string = "Reverse", serialize = "~")]
  Reverse,
  // Code 31

  // Operators //
  #[strum(to_string = "PopAtom", serialize = ">")]
  PopAtom,
  #[strum(to_string = "PushAtom", serialize = "<")]
  PushAtom,
  #[strum(to_string = "Write", serialize = "w")]
  Write,
  #[strum(to_string = "WriteLine", serialize = "W")]
  WriteLine,
  #[strum(to_string = "ReadLine", serialize = "r")]
  ReadLine,
  #[strum(to_string = "ToInt", serialize = "#")]
  ToInt,
  #[strum(to_string = "ToStr", serialize = ",")]
  ToStr,
  #[strum(to_string = "Add", serialize = "+")]
  Add,
  #[strum(to_string = "Sub", serialize = "-")]
  Sub,
  #[strum(to_string = "Mul", serialize = "*")]
  Mul,
  #[strum(to_string = "Div", serialize = "/")]
  Div,
  #[strum(to_string = "GridAdd", serialize = "%+")]
  GridAdd,
  #[strum(to_string = "GridSub", serialize = "%-")]
  GridSub,
  #[strum(to_string = "GridMul", serialize = "%*")]
  GridMul,
  #[strum(to_string = "GridDiv", serialize = "%/")]
  GridDiv,
  #[strum(to_string = "RankAdd", serialize = "[+")]
  RankAdd,
  #[strum(to_string = "RankSub", serialize = "[-")]
  RankSub,
  #[strum(to_string = "RankMul", serialize = "[*")]
  RankMul,
  #[strum(to_string = "RankDiv", serialize = "[/")]
  RankDiv,
  #[strum(to_string = "JumpPop", serialize = "j>")]
  JumpPop,
  #[strum(to_string = "JumpPopIf", serialize = "j?")]
  JumpPopIf,
  #[strum(to_string = "JumpPush", serialize = "j<")]
  JumpPush,
  #[strum(to_string = "JumpSave", serialize = ".")]
  JumpSave,
  #[strum(to_string = "Equal", serialize = "=")]
  Equal,
  #[strum(to_string = "GreaterEqual", serialize = "F")]
  GreaterEqual,
  #[strum(to_string = "Greater", serialize = "G")]
  Greater,
  #[strum(to_string = "Less", serialize = "L")]
  Less,
  #[strum(to_string = "LessEqual", serialize = "M")]
  LessEqual,
  #[strum(to_string = "And", serialize = "&")]
  And,
  #[strum(to_string = "Or", serialize = "?|")]
  Or,
  #[strum(to_string = "Not", serialize = "!")]
  Not,
}

pub const MAX_LITERAL_CODE: u8 = InstructionKind::ToggleBit0 as u8;
pub const MAX_BIT_TOGGLE_CODE: u8 = InstructionKind::ToggleColumn0 as u8;
pub const MAX_COLUMN_TOGGLE_CODE: u8 = InstructionKind::ToggleRow0 as u8;
pub const MAX_ROW_TOGGLE_CODE: u8 = InstructionKind::ToggleMatrix as u8;

impl InstructionKind {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The kind `offset` places after `base`, if there is one.
  fn offset(base: InstructionKind, offset: u32, count: u32) -> Option<InstructionKind> {
    match offset < count {
      true  => InstructionKind::try_from(base.code() + offset as u8).ok(),
      false => None
    }
  }

  /// The toggle for the register with the given index, which must be less than 16.
  pub fn toggle_bit(index: u32) -> Option<InstructionKind> {
    InstructionKind::offset(InstructionKind::ToggleBit0, index, (GRID_SIDE * GRID_SIDE) as u32)
  }

  pub fn toggle_column(column: u32) -> Option<InstructionKind> {
    InstructionKind::offset(InstructionKind::ToggleColumn0, column, GRID_SIDE as u32)
  }

  pub fn toggle_row(row: u32) -> Option<InstructionKind> {
    InstructionKind::offset(InstructionKind::ToggleRow0, row, GRID_SIDE as u32)
  }

  /// Literal instructions carry payload text and push an atom when executed.
  pub fn is_literal(&self) -> bool {
    self.code() < MAX_LITERAL_CODE
  }

  /// The bits this instruction XORs into the selection mask, or `None` if it is not a toggle.
  pub fn toggle_mask(&self) -> Option<u16> {
    let code = self.code();
    match code {
      c if c < MAX_LITERAL_CODE       => None,
      c if c < MAX_BIT_TOGGLE_CODE    => Some(1u16 << (c - MAX_LITERAL_CODE)),
      c if c < MAX_COLUMN_TOGGLE_CODE => Some(COLUMN_MASK << (c - MAX_BIT_TOGGLE_CODE)),
      c if c < MAX_ROW_TOGGLE_CODE    => {
        Some(ROW_MASK << (GRID_SIDE as u8 * (c - MAX_COLUMN_TOGGLE_CODE)))
      }
      c if c == MAX_ROW_TOGGLE_CODE   => Some(FULL_MASK),
      _c                              => None
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn glyphs_name_operators(){
    assert_eq!(InstructionKind::from_str(">"),  Ok(InstructionKind::PopAtom));
    assert_eq!(InstructionKind::from_str("%/"), Ok(InstructionKind::GridDiv));
    assert_eq!(InstructionKind::from_str("[*"), Ok(InstructionKind::RankMul));
    assert_eq!(InstructionKind::from_str("j?"), Ok(InstructionKind::JumpPopIf));
    assert_eq!(InstructionKind::from_str("?|"), Ok(InstructionKind::Or));
    assert_eq!(InstructionKind::from_str("W"),  Ok(InstructionKind::WriteLine));
    assert!(InstructionKind::from_str("x").is_err());
    assert!(InstructionKind::from_str("%").is_err());
  }

  #[test]
  fn display_uses_names(){
    assert_eq!(InstructionKind::JumpSave.to_string(), "JumpSave");
    assert_eq!(InstructionKind::ToggleBitC.to_string(), "ToggleBitC");
    let name: &'static str = InstructionKind::Or.into();
    assert_eq!(name, "Or");
  }

  #[test]
  fn toggle_kinds_from_offsets(){
    assert_eq!(InstructionKind::toggle_bit(0),  Some(InstructionKind::ToggleBit0));
    assert_eq!(InstructionKind::toggle_bit(15), Some(InstructionKind::ToggleBitF));
    assert_eq!(InstructionKind::toggle_bit(16), None);
    assert_eq!(InstructionKind::toggle_column(3), Some(InstructionKind::ToggleColumn3));
    assert_eq!(InstructionKind::toggle_row(2), Some(InstructionKind::ToggleRow2));
    assert_eq!(InstructionKind::toggle_row(4), None);
  }

  #[test]
  fn toggle_masks(){
    assert_eq!(InstructionKind::ToggleBit0.toggle_mask(), Some(0x0001));
    assert_eq!(InstructionKind::ToggleBitF.toggle_mask(), Some(0x8000));
    assert_eq!(InstructionKind::ToggleColumn0.toggle_mask(), Some(0x1111));
    assert_eq!(InstructionKind::ToggleColumn3.toggle_mask(), Some(0x8888));
    assert_eq!(InstructionKind::ToggleRow0.toggle_mask(), Some(0x000F));
    assert_eq!(InstructionKind::ToggleRow3.toggle_mask(), Some(0xF000));
    assert_eq!(InstructionKind::ToggleMatrix.toggle_mask(), Some(0xFFFF));
    assert_eq!(InstructionKind::StringLiteral.toggle_mask(), None);
    assert_eq!(InstructionKind::ModeColumn.toggle_mask(), None);
    assert_eq!(InstructionKind::Not.toggle_mask(), None);
  }

  #[test]
  fn literal_range(){
    assert!(InstructionKind::StringLiteral.is_literal());
    assert!(InstructionKind::NumberLiteral.is_literal());
    assert!(!InstructionKind::ToggleBit0.is_literal());
  }
}
