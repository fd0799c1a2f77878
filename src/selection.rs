//! Addressing of the 4×4 register grid: the selection mask, the traversal mode, and the
//! `Selection` iterator that every operator visits registers through.

use std::fmt::{Display, Formatter};

/// Number of registers along one side of the grid.
pub const GRID_SIDE: usize = 4;
pub const REGISTER_COUNT: usize = GRID_SIDE * GRID_SIDE;

/// Bits of column 0; shift left by the column number for the others.
pub const COLUMN_MASK: u16 = 0x1111;
/// Bits of row 0; shift left by four times the row number for the others.
pub const ROW_MASK: u16 = 0x000F;
pub const FULL_MASK: u16 = 0xFFFF;

/// Which registers take part in the next operation. Bit `i` selects register `i`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct Mask(u16);

impl Mask {
  pub fn new(bits: u16) -> Mask {
    Mask(bits)
  }

  pub fn bits(&self) -> u16 {
    self.0
  }

  /// XORs `bits` into the mask. Toggling the same bits twice restores the mask.
  pub fn toggle(&mut self, bits: u16) {
    self.0 ^= bits;
  }

  pub fn is_selected(&self, index: usize) -> bool {
    index < REGISTER_COUNT && self.0 & (1 << index) != 0
  }
}

impl Display for Mask {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:#06X}", self.0)
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Axis {
  Row,
  Column
}

impl Display for Axis {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Axis::Row    => write!(f, "Row"),
      Axis::Column => write!(f, "Column")
    }
  }
}

/// The order in which selected registers are visited.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Traversal {
  pub axis     :  Axis,
  pub reversed :  bool
}

impl Default for Traversal {
  fn default() -> Self {
    Traversal {
      axis     :  Axis::Row,
      reversed :  false
    }
  }
}

impl Traversal {
  pub fn new(axis: Axis, reversed: bool) -> Traversal {
    Traversal { axis, reversed }
  }

  /**
    All 16 register indices in visiting order. Rows (or columns) are always taken 0..3; the
    `reversed` flag only reverses the order within each row (or column).
  */
  pub fn grid_order(&self) -> [usize; REGISTER_COUNT] {
    let mut order = [0usize; REGISTER_COUNT];
    for outer in 0..GRID_SIDE {
      for step in 0..GRID_SIDE {
        let inner = match self.reversed {
          true  => GRID_SIDE - 1 - step,
          false => step
        };
        order[outer * GRID_SIDE + step] = match self.axis {
          Axis::Row    => outer * GRID_SIDE + inner,
          Axis::Column => inner * GRID_SIDE + outer
        };
      }
    }
    order
  }
}

impl Display for Traversal {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.reversed {
      true  => write!(f, "{}, reversed", self.axis),
      false => write!(f, "{}", self.axis)
    }
  }
}

/// A register visited by a `Selection`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Selected {
  /// The register's absolute index, 0–15.
  pub grid_id : usize,
  /// The register's position among the selected registers only.
  pub rank    : usize
}

/**
  Iterates over the selected registers in traversal order. The iterator owns a copy of the mask
  and traversal, so the machine may mutate its registers while visiting them.
*/
#[derive(Clone, Debug)]
pub struct Selection {
  order    :  [usize; REGISTER_COUNT],
  mask     :  Mask,
  position :  usize,
  rank     :  usize
}

impl Selection {
  pub fn new(mask: Mask, traversal: Traversal) -> Selection {
    Selection {
      order    :  traversal.grid_order(),
      mask,
      position :  0,
      rank     :  0
    }
  }
}

impl Iterator for Selection {
  type Item = Selected;

  fn next(&mut self) -> Option<Selected> {
    while self.position < REGISTER_COUNT {
      let grid_id = self.order[self.position];
      self.position += 1;
      if self.mask.is_selected(grid_id) {
        let selected = Selected { grid_id, rank: self.rank };
        self.rank += 1;
        return Some(selected);
      }
    }
    None
  }
}
