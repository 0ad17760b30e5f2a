use thiserror::Error;

use crate::diagnostic::ParseError;

/// Fatal errors for the compiler driver. Semantic diagnostics are not
/// errors in this sense — they are collected and reported, and never stop
/// the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
