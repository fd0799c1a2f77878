use std::str::Chars;

/// A peekable character iterator that tracks the current source line.
#[derive(Debug, Clone)]
pub struct CharIter<'d> {
  chars      :  Chars<'d>,
  next_char  :  Option<char>,
  line       :  u32
}

impl<'d> Iterator for CharIter<'d>{
  type Item = char;

  fn next(&mut self) -> Option<char>{
    match self.next_char.take() {

      None => {
        let c = self.chars.next();
        self.increment_location(c)
      },

      otherwise => self.increment_location(otherwise)

    } // end match
  } // end fn next
}

impl<'d> CharIter<'d>{

  pub fn new(text: &'d str) -> Self{
    CharIter{
      chars      :  text.chars(),
      next_char  :  None,
      line       :  1
    }
  }

  /// Returns the next character without consuming it or incrementing the line.
  pub fn peek(&mut self) -> Option<char>{
    match self.next_char {

      None => {
        self.next_char = self.chars.next();
        self.next_char
      },

      otherwise => otherwise

    }
  }

  /// The 1-based line of the next character.
  pub fn line(&self) -> u32 {
    self.line
  }

  /// Passes `next_char` through while incrementing `self.line` as necessary.
  fn increment_location(&mut self, next_char: Option<char>) -> Option<char>{
    if next_char == Some('\n') {
      self.line += 1;
    }
    next_char
  }

  pub fn is_empty(&mut self) -> bool{
    self.peek().is_none()
  }

  /// Consumes leading whitespace, counting newlines. Whitespace is the C locale's `isspace` set.
  pub fn trim_left(&mut self){
    while let Some(c) = self.peek() {
      if !is_space(c) {
        break;
      }
      self.next();
    }
  }

  /// Consumes the prefix for which each character `c` matches `pred(c)`, returning the prefix.
  /// The prefix may be empty.
  pub fn get_prefix_match<P>(&mut self, pred: P) -> String
    where P: Fn(char) -> bool
  {
    let mut prefix = String::new();
    while let Some(c) = self.peek() {
      if !pred(c) {
        break;
      }
      prefix.push(c);
      self.next();
    }
    prefix
  }
}

fn is_space(c: char) -> bool {
  matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}
