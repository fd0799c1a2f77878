//! The register-grid machine: state, the fetch-execute loop, and one method per operation.
//!
//! Every operation that touches registers visits them through `Selection`, i.e. the registers
//! selected by the mask, in the current traversal order. Operations that need a value from an
//! empty stack do nothing, and so do divisions by zero; the machine has no runtime error path.
//! Only the host's I/O streams can fail.

use std::fmt::{Display, Formatter};
use std::io::{BufRead, Read, Write};

use prettytable::{Cell as TableCell, Row as TableRow, Table};
use tracing::{debug, trace};

use crate::atom::{parse_integer, Atom};
use crate::error::MachineError;
use crate::instruction::InstructionKind;
use crate::register::{BoundedText, Register};
use crate::selection::{Axis, Mask, Selected, Selection, Traversal, GRID_SIDE, REGISTER_COUNT};
use crate::token::Token;
use crate::TABLE_DISPLAY_FORMAT;

/// Written before every `read-line`.
pub const PROMPT: &str = ">: ";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Arithmetic {
  Add,
  Sub,
  Mul,
  Div
}

impl Arithmetic {
  /// `None` when the operation must not touch the register.
  fn apply(self, value: i64, operand: i64) -> Option<i64> {
    match self {
      Arithmetic::Add => Some(value.wrapping_add(operand)),
      Arithmetic::Sub => Some(value.wrapping_sub(operand)),
      Arithmetic::Mul => Some(value.wrapping_mul(operand)),
      Arithmetic::Div => {
        match operand {
          0 => None,
          _ => Some(value.wrapping_div(operand))
        }
      }
    }
  }
}

/// Where the right-hand side of an arithmetic operation comes from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Operand {
  Scalar(i64),
  GridId,
  Rank
}

impl Operand {
  fn resolve(self, selected: Selected) -> i64 {
    match self {
      Operand::Scalar(value) => value,
      Operand::GridId        => selected.grid_id as i64,
      Operand::Rank          => selected.rank as i64
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Comparison {
  GreaterEqual,
  Greater,
  Less,
  LessEqual
}

impl Comparison {
  fn holds(self, value: i64, scalar: i64) -> bool {
    match self {
      Comparison::GreaterEqual => value >= scalar,
      Comparison::Greater      => value >  scalar,
      Comparison::Less         => value <  scalar,
      Comparison::LessEqual    => value <= scalar
    }
  }
}

pub struct Machine {
  registers :  [Register; REGISTER_COUNT],
  mask      :  Mask,
  traversal :  Traversal,
  /// Index of the next instruction to fetch.
  ip        :  usize,
  atoms     :  Vec<Atom>,
  /// Jump targets are signed; registers may push any value, and only in-range ones are followed.
  jumps     :  Vec<i64>
}

impl Default for Machine {
  fn default() -> Self {
    Machine::new()
  }
}

impl Machine {

  // region Display methods

  fn make_grid_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"", ub->"0", ub->"1", ub->"2", ub->"3"]);

    for row in 0..GRID_SIDE {
      let mut cells = vec![TableCell::new(&row.to_string())];
      for column in 0..GRID_SIDE {
        let index = row * GRID_SIDE + column;
        let text  = match self.mask.is_selected(index) {
          true  => format!("* {}", self.registers[index]),
          false => format!("{}", self.registers[index])
        };
        cells.push(TableCell::new(&text));
      }
      table.add_row(TableRow::new(cells));
    }
    table
  }

  /// Lists a stack top first.
  fn make_stack_table<T>(name: char, values: &[T]) -> Table
    where T: Display
  {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Depth", ubl->"Contents"]);

    for (depth, value) in values.iter().rev().enumerate() {
      table.add_row(row![r->format!("{}[{}] =", name, depth), format!("{}", value)]);
    }
    table
  }

  // endregion

  // region Accessors

  pub fn new() -> Machine {
    Machine {
      registers :  [Register::default(); REGISTER_COUNT],
      mask      :  Mask::default(),
      traversal :  Traversal::default(),
      ip        :  0,
      atoms     :  vec![],
      jumps     :  vec![]
    }
  }

  pub fn register(&self, index: usize) -> Option<&Register> {
    self.registers.get(index)
  }

  pub fn registers(&self) -> &[Register; REGISTER_COUNT] {
    &self.registers
  }

  /// Overwrites a register; indices outside the grid are ignored.
  pub fn set_register(&mut self, index: usize, register: Register) {
    if let Some(slot) = self.registers.get_mut(index) {
      *slot = register;
    }
  }

  pub fn mask(&self) -> Mask {
    self.mask
  }

  pub fn traversal(&self) -> Traversal {
    self.traversal
  }

  pub fn instruction_pointer(&self) -> usize {
    self.ip
  }

  /// The atom stack, bottom first.
  pub fn atoms(&self) -> &[Atom] {
    &self.atoms
  }

  /// The jump stack, bottom first.
  pub fn jumps(&self) -> &[i64] {
    &self.jumps
  }

  fn selection(&self) -> Selection {
    Selection::new(self.mask, self.traversal)
  }

  /// Values of the selected integer registers, in traversal order. Text registers are skipped.
  fn selected_integers(&self) -> impl Iterator<Item = i64> + '_ {
    self.selection().filter_map(move |selected| {
      match self.registers[selected.grid_id] {
        Register::Integer(value) => Some(value),
        Register::Text(_)        => None
      }
    })
  }

  // endregion

  // region Execution

  /**
    Runs `program` from the current instruction pointer until the pointer runs off the end.
    There is no halt instruction; a program whose jumps never leave a loop never returns.
  */
  pub fn run<R, W>(&mut self, program: &[Token], input: &mut R, output: &mut W)
    -> Result<(), MachineError>
    where R: BufRead,
          W: Write
  {
    debug!(instructions = program.len(), "running program");

    while self.ip < program.len() {
      self.step(program, input, output)?;
    }
    output.flush()?;

    debug!(atoms = self.atoms.len(), jumps = self.jumps.len(), "program finished");
    Ok(())
  }

  /// Fetches the instruction at the pointer, advances the pointer, then executes the instruction.
  pub fn step<R, W>(&mut self, program: &[Token], input: &mut R, output: &mut W)
    -> Result<(), MachineError>
    where R: BufRead,
          W: Write
  {
    let token = match program.get(self.ip) {
      Some(token) => token,
      None        => return Ok(())
    };
    self.ip += 1;
    trace!(pointer = self.ip - 1, line = token.line, instruction = %token, "execute");

    self.execute(token, program.len(), input, output)?;

    #[cfg(feature = "trace_computation")] eprintln!("{}", self);
    Ok(())
  }

  fn execute<R, W>(&mut self, token: &Token, program_len: usize, input: &mut R, output: &mut W)
    -> Result<(), MachineError>
    where R: BufRead,
          W: Write
  {
    // The 25 toggles differ only in their bits.
    if let Some(bits) = token.kind.toggle_mask() {
      self.mask.toggle(bits);
      return Ok(());
    }

    match token.kind {

      | InstructionKind::StringLiteral
      | InstructionKind::CharLiteral
      | InstructionKind::NumberLiteral => self.push_literal(token),

      InstructionKind::ModeColumn   => self.traversal.axis = Axis::Column,
      InstructionKind::ModeRow      => self.traversal.axis = Axis::Row,
      InstructionKind::Reverse      => self.traversal.reversed = !self.traversal.reversed,

      InstructionKind::PopAtom      => self.pop_atom(),
      InstructionKind::PushAtom     => self.push_atoms(),
      InstructionKind::Write        => self.write(output, false)?,
      InstructionKind::WriteLine    => self.write(output, true)?,
      InstructionKind::ReadLine     => self.read_line(input, output)?,
      InstructionKind::ToInt        => self.convert(Register::to_integer),
      InstructionKind::ToStr        => self.convert(Register::to_text),

      InstructionKind::Add          => self.scalar_arithmetic(Arithmetic::Add),
      InstructionKind::Sub          => self.scalar_arithmetic(Arithmetic::Sub),
      InstructionKind::Mul          => self.scalar_arithmetic(Arithmetic::Mul),
      InstructionKind::Div          => self.scalar_arithmetic(Arithmetic::Div),
      InstructionKind::GridAdd      => self.arithmetic(Arithmetic::Add, Operand::GridId),
      InstructionKind::GridSub      => self.arithmetic(Arithmetic::Sub, Operand::GridId),
      InstructionKind::GridMul      => self.arithmetic(Arithmetic::Mul, Operand::GridId),
      InstructionKind::GridDiv      => self.arithmetic(Arithmetic::Div, Operand::GridId),
      InstructionKind::RankAdd      => self.arithmetic(Arithmetic::Add, Operand::Rank),
      InstructionKind::RankSub      => self.arithmetic(Arithmetic::Sub, Operand::Rank),
      InstructionKind::RankMul      => self.arithmetic(Arithmetic::Mul, Operand::Rank),
      InstructionKind::RankDiv      => self.arithmetic(Arithmetic::Div, Operand::Rank),

      InstructionKind::JumpPop      => self.jump_pop(program_len),
      InstructionKind::JumpPopIf    => self.jump_pop_if(program_len),
      InstructionKind::JumpPush     => self.jump_push(),
      // The pointer has already moved past this instruction.
      InstructionKind::JumpSave     => self.jumps.push((self.ip - 1) as i64),

      InstructionKind::Equal        => self.equal(),
      InstructionKind::GreaterEqual => self.compare(Comparison::GreaterEqual),
      InstructionKind::Greater      => self.compare(Comparison::Greater),
      InstructionKind::Less         => self.compare(Comparison::Less),
      InstructionKind::LessEqual    => self.compare(Comparison::LessEqual),

      InstructionKind::And          => {
        let all_set = self.selected_integers().all(|value| value != 0);
        self.atoms.push(Atom::from_bool(all_set));
      }
      InstructionKind::Or           => {
        let any_set = self.selected_integers().any(|value| value != 0);
        self.atoms.push(Atom::from_bool(any_set));
      }
      InstructionKind::Not          => {
        for selected in self.selection() {
          if let Register::Integer(value) = self.registers[selected.grid_id] {
            self.registers[selected.grid_id] = Register::Integer((value == 0) as i64);
          }
        }
      }

      _kind => {
        trace!(instruction = %token, "no operation");
      }

    } // end match on instruction kind

    Ok(())
  }

  // endregion

  // region Operations

  fn push_literal(&mut self, token: &Token) {
    match Atom::from_token(token) {
      Some(atom) => self.atoms.push(atom),
      None       => trace!(instruction = %token, "literal without payload")
    }
  }

  /// Pops the atom stack, logging the skipped operation when it is empty.
  fn pop_atom_for(&mut self, operation: &str) -> Option<Atom> {
    let atom = self.atoms.pop();
    if atom.is_none() {
      trace!(operation, "atom stack empty; skipping");
    }
    atom
  }

  /// Stores the popped atom into every selected register.
  fn pop_atom(&mut self) {
    if let Some(atom) = self.pop_atom_for("pop-atom") {
      let value = atom.to_register();
      for selected in self.selection() {
        self.registers[selected.grid_id] = value;
      }
    }
  }

  /// Pushes every selected register as an atom; the last visited ends up on top.
  fn push_atoms(&mut self) {
    for selected in self.selection() {
      self.atoms.push(Atom::from(&self.registers[selected.grid_id]));
    }
  }

  fn write<W: Write>(&self, output: &mut W, newline: bool) -> Result<(), MachineError> {
    for selected in self.selection() {
      match &self.registers[selected.grid_id] {
        Register::Integer(value) => write!(output, "{}", value)?,
        Register::Text(text)     => output.write_all(text.as_bytes())?
      }
      if newline {
        output.write_all(b"\n")?;
      }
    }
    Ok(())
  }

  /// Prompts, then stores one whitespace-delimited word of input into every selected register.
  fn read_line<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<(), MachineError>
    where R: BufRead,
          W: Write
  {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let word = read_word(input)?;
    let text = BoundedText::new(&word);
    for selected in self.selection() {
      self.registers[selected.grid_id] = Register::Text(text);
    }
    Ok(())
  }

  fn convert(&mut self, conversion: fn(&Register) -> Register) {
    for selected in self.selection() {
      self.registers[selected.grid_id] = conversion(&self.registers[selected.grid_id]);
    }
  }

  fn scalar_arithmetic(&mut self, operation: Arithmetic) {
    if let Some(atom) = self.pop_atom_for("arithmetic") {
      self.arithmetic(operation, Operand::Scalar(atom.scalar()));
    }
  }

  /// Applies `operation` to every selected integer register. Text registers are untouched.
  fn arithmetic(&mut self, operation: Arithmetic, operand: Operand) {
    for selected in self.selection() {
      if let Register::Integer(value) = self.registers[selected.grid_id] {
        if let Some(result) = operation.apply(value, operand.resolve(selected)) {
          self.registers[selected.grid_id] = Register::Integer(result);
        }
      }
    }
  }

  fn compare(&mut self, comparison: Comparison) {
    if let Some(atom) = self.pop_atom_for("comparison") {
      let scalar = atom.scalar();
      for selected in self.selection() {
        if let Register::Integer(value) = self.registers[selected.grid_id] {
          self.registers[selected.grid_id] = Register::Integer(comparison.holds(value, scalar) as i64);
        }
      }
    }
  }

  /**
    Number atoms compare numerically with integer registers; string atoms compare byte for byte
    with text registers, which become integer registers holding the result. Any other pairing
    leaves the register unchanged.
  */
  fn equal(&mut self) {
    let atom = match self.pop_atom_for("equal") {
      Some(atom) => atom,
      None       => return
    };

    for selected in self.selection() {
      let register = &mut self.registers[selected.grid_id];
      match (&atom, *register) {

        (Atom::Number(number), Register::Integer(value)) => {
          *register = Register::Integer((value == parse_integer(number.as_bytes())) as i64);
        }

        (Atom::Str(expected), Register::Text(text)) => {
          *register = Register::Integer((text.as_bytes() == expected.as_slice()) as i64);
        }

        _ => {}

      }
    }
  }

  /// Moves the pointer to `target` if it names an instruction of the program.
  fn jump_to(&mut self, target: i64, program_len: usize) {
    match usize::try_from(target) {
      Ok(index) if index < program_len => self.ip = index,
      _                                => trace!(jump = target, "jump target out of range; ignoring")
    }
  }

  fn jump_pop(&mut self, program_len: usize) {
    match self.jumps.pop() {
      Some(target) => self.jump_to(target, program_len),
      None         => trace!("jump stack empty; skipping")
    }
  }

  /// Consumes a jump target and an atom, jumping when the atom reads as non-zero.
  fn jump_pop_if(&mut self, program_len: usize) {
    if self.jumps.is_empty() || self.atoms.is_empty() {
      trace!(jumps = self.jumps.len(), atoms = self.atoms.len(), "conditional jump starved; skipping");
      return;
    }

    if let (Some(target), Some(condition)) = (self.jumps.pop(), self.atoms.pop()) {
      if condition.scalar() != 0 {
        self.jump_to(target, program_len);
      }
    }
  }

  fn jump_push(&mut self) {
    let targets: Vec<i64> = self.selected_integers().collect();
    self.jumps.extend(targets);
  }

  // endregion

}

/// Reads one whitespace-delimited word, skipping leading whitespace. Empty at end of input.
fn read_word<R: BufRead>(input: &mut R) -> std::io::Result<Vec<u8>> {
  let mut word = Vec::new();
  for byte in input.by_ref().bytes() {
    let byte = byte?;
    match byte.is_ascii_whitespace() {
      true if word.is_empty() => continue,
      true                    => break,
      false                   => word.push(byte)
    }
  }
  Ok(word)
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let grid_table  = self.make_grid_table();
    let atom_table  = Machine::make_stack_table('A', &self.atoms[..]);
    let jump_table  = Machine::make_stack_table('J', &self.jumps[..]);

    let mut combined_table = table!([grid_table, atom_table, jump_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Atoms", ub->"Jumps"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(
      f,
      "Pointer: {}\tMask: {}\tMode: {}\n{}",
      self.ip, self.mask, self.traversal, combined_table
    )
  }
}
