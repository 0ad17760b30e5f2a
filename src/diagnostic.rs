//! Diagnostic collection and error types.
//!
//! Semantic analysis never aborts: every violation is reported as a
//! [`Diagnostic`] at the smallest enclosing construct and analysis continues
//! with the siblings. The engine collects diagnostics in traversal order and
//! hands them back to the caller; printing them is the driver's concern.

use thiserror::Error;

use crate::ast::{BinaryOp, ConstantKind, NameId};
use crate::source::SourcePos;

/// A single collected diagnostic: a source position plus a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: SourcePos,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Line {}:{}]: {}",
            self.pos.line, self.pos.column, self.message
        )
    }
}

/// Fatal front-end errors from the lexer and parser.
///
/// Unlike semantic diagnostics these abort the run: without a well-formed
/// parse tree there is nothing for the later passes to walk.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, pos: SourcePos },

    #[error("Unterminated {what} literal")]
    UnterminatedLiteral { what: &'static str, pos: SourcePos },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: SourcePos,
    },

    #[error("Unexpected end of file")]
    UnexpectedEof { pos: SourcePos },
}

impl ParseError {
    pub fn pos(&self) -> SourcePos {
        match self {
            ParseError::UnexpectedCharacter { pos, .. } => *pos,
            ParseError::UnterminatedLiteral { pos, .. } => *pos,
            ParseError::UnexpectedToken { pos, .. } => *pos,
            ParseError::UnexpectedEof { pos } => *pos,
        }
    }
}

/// Semantic errors, one variant per violation class.
#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("The identifier \"{name}\" is already defined in scope \"{scope}\".")]
    DuplicateIdentifier {
        name: NameId,
        scope: NameId,
        pos: SourcePos,
    },

    #[error("Type \"{name}\" is not defined yet.")]
    UnresolvedType { name: NameId, pos: SourcePos },

    #[error("Constant type \"{kind}\" cannot be assigned to type \"{type_name}\".")]
    ConstantKindMismatch {
        kind: ConstantKind,
        type_name: NameId,
        pos: SourcePos,
    },

    #[error("Value \"{value}\" cannot be assigned to type \"{type_name}\".")]
    ConstantValueMismatch {
        value: NameId,
        type_name: NameId,
        pos: SourcePos,
    },

    #[error("The array length must be an integer number. \"{kind}\" is provided.")]
    ArrayBoundNotInteger { kind: ConstantKind, pos: SourcePos },

    #[error("The operator \"{op}\" cannot be used between type \"{left}\" and type \"{right}\".")]
    OperatorKindConflict {
        op: BinaryOp,
        left: ConstantKind,
        right: ConstantKind,
        pos: SourcePos,
    },
}

impl SemanticError {
    pub fn pos(&self) -> SourcePos {
        match self {
            SemanticError::DuplicateIdentifier { pos, .. } => *pos,
            SemanticError::UnresolvedType { pos, .. } => *pos,
            SemanticError::ConstantKindMismatch { pos, .. } => *pos,
            SemanticError::ConstantValueMismatch { pos, .. } => *pos,
            SemanticError::ArrayBoundNotInteger { pos, .. } => *pos,
            SemanticError::OperatorKindConflict { pos, .. } => *pos,
        }
    }
}

/// Collects semantic diagnostics in the order they are reported.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine::default()
    }

    pub fn report(&mut self, error: SemanticError) {
        self.diagnostics.push(Diagnostic {
            pos: error.pos(),
            message: error.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
