//! The compiler driver: CLI parsing and pipeline orchestration.
//!
//! The pipeline is lex → parse → build AST → analyze → emit. Semantic
//! diagnostics go to stderr but never stop emission; only front-end and I/O
//! failures abort the run.

use clap::Parser as ClapParser;
use log::debug;
use std::fs;
use std::path::PathBuf;

use crate::ast::builder::AstBuilder;
use crate::ast::dumper::AstDumper;
use crate::codegen::CppGenerator;
use crate::diagnostic::Diagnostic;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantic::Analyzer;

/// Command-line arguments for the MIDL compiler.
#[derive(ClapParser, Default)]
#[command(version, about = "MIDL to C++ declaration compiler written in Rust", long_about = None)]
pub struct Cli {
    /// The input IDL file
    #[arg()]
    pub input_file: String,

    /// Output file for the generated declarations
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Write a plain-text AST dump to this file
    #[arg(long)]
    pub dump_ast: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Result of compiling one translation unit.
pub struct CompileOutput {
    pub code: String,
    pub ast_dump: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Compiler {
    cli: Cli,
}

impl Compiler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the full pipeline over a source string.
    pub fn compile_source(source: &str) -> Result<CompileOutput, Error> {
        let tokens = Lexer::new(source).tokenize()?;
        debug!("lexed {} tokens", tokens.len());
        let tree = Parser::new(tokens).parse()?;
        debug!("parsed {} parse nodes", tree.len());

        let mut ast = AstBuilder::build(&tree);
        let analysis = Analyzer::analyze(&ast);
        debug!(
            "analysis finished with {} diagnostics",
            analysis.diagnostics.len()
        );
        ast.attach_semantic_info(analysis.semantic);

        Ok(CompileOutput {
            code: CppGenerator::generate(&ast),
            ast_dump: AstDumper::dump(&ast),
            diagnostics: analysis.diagnostics,
        })
    }

    /// Drive compilation from the CLI configuration: read the input file,
    /// report diagnostics on stderr, write the generated declarations and
    /// the optional AST dump.
    pub fn run(&mut self) -> Result<(), Error> {
        self.log(&format!("reading {}", self.cli.input_file));
        let source = fs::read_to_string(&self.cli.input_file)?;

        let output = Self::compile_source(&source)?;
        for diagnostic in &output.diagnostics {
            eprintln!("{diagnostic}");
        }

        if let Some(dump_path) = &self.cli.dump_ast {
            self.log(&format!("writing AST dump to {dump_path}"));
            fs::write(dump_path, &output.ast_dump)?;
        }

        let output_path = match &self.cli.output_file {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.cli.input_file).with_extension("hxx"),
        };
        self.log(&format!("writing {}", output_path.display()));
        fs::write(&output_path, &output.code)?;

        self.log("Completed.");
        Ok(())
    }

    fn log(&self, msg: &str) {
        debug!("{}", msg);
        if self.cli.verbose {
            eprintln!("[midlc] {msg}");
        }
    }
}
