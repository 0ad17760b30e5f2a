use clap::Parser as ClapParser;
use midlc::compiler::{Cli, Compiler};
use std::process::exit;

fn main() {
    if !run() {
        exit(1);
    }
}

/// Parses command-line arguments and runs the compiler. Returns `false` on
/// fatal errors (bad input file, lex/parse failure); semantic diagnostics
/// are reported but do not fail the run.
fn run() -> bool {
    let cli = Cli::parse();
    let mut compiler = Compiler::new(cli);
    match compiler.run() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}
