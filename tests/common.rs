use midlc::compiler::{CompileOutput, Compiler};

pub fn compile(source: &str) -> CompileOutput {
    Compiler::compile_source(source).expect("compilation failed")
}

#[allow(dead_code)]
pub fn diagnostics(source: &str) -> Vec<String> {
    compile(source)
        .diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect()
}
