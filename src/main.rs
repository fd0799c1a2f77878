//! Command line front end: reads a program file, lexes it and runs it against stdin/stdout.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use ematrm::token::instruction_table;
use ematrm::{interpret, lex, Error};

#[derive(Parser)]
#[command(name = "ematrm")]
#[command(about = "Runs a register-grid program", long_about = None)]
#[command(version)]
struct Cli {
  /// Program source file
  file: PathBuf,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Print the lexed instruction table to stderr before running
  #[arg(long)]
  tokens: bool,

  /// Print the final machine state to stderr after running
  #[arg(long)]
  dump: bool,
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e)  => {
      let _ = e.print();
      return match e.use_stderr() {
        true  => ExitCode::FAILURE,
        false => ExitCode::SUCCESS
      };
    }
  };

  let level = match cli.verbose {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE
  };
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_max_level(level)
    .init();

  match run(&cli) {
    Ok(())  => ExitCode::SUCCESS,
    Err(e)  => {
      eprintln!("err: {:#}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let source = fs::read(&cli.file)
    .with_context(|| format!("failed to open file {}!", cli.file.display()))?;
  let source = String::from_utf8_lossy(&source);

  if cli.tokens {
    // A program that does not lex is reported by `interpret` below.
    if let Ok(program) = lex(&source) {
      eprintln!("{}", instruction_table(&program, None));
    }
  }

  let stdin  = io::stdin();
  let stdout = io::stdout();
  let mut input  = stdin.lock();
  let mut output = io::BufWriter::new(stdout.lock());

  let result = interpret(&source, &mut input, &mut output);
  output.flush().context("failed to flush output")?;
  let machine = match result {
    Ok(machine)          => machine,
    Err(Error::Lex(e))   => {
      eprintln!("{}", e);
      anyhow::bail!("failed to lex file!");
    }
    Err(e)               => return Err(e).context("program aborted")
  };

  if cli.dump {
    eprintln!("{}", machine);
  }
  Ok(())
}
