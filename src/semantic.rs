//! Semantic analysis: scope resolution and type checking.
//!
//! Two passes over the AST. Pass 1 ([`ScopeResolver`]) builds the scope tree
//! and the type registry; pass 2 ([`TypeChecker`]) resolves member types and
//! validates declarators and their constant initializers. Diagnostics are
//! collected, never printed, and never fatal — both passes always visit the
//! whole tree.

use hashbrown::HashSet;

use crate::ast::{Ast, NodeRef};
use crate::diagnostic::{Diagnostic, DiagnosticEngine};

pub mod resolver;
pub mod scope;
pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests_resolver;

pub use resolver::ScopeResolver;
pub use scope::{IdentifierKind, Scope, ScopeId, ScopeTree};
pub use type_checker::TypeChecker;
pub use types::{PrimitiveType, SystemType, TypeRegistry};

/// Side table attached to the AST after analysis.
#[derive(Debug, Clone, Default)]
pub struct SemanticInfo {
    /// Declarators whose initializer failed a constant check; code
    /// generation emits them without their initializers.
    pub suppressed_initializers: HashSet<NodeRef>,
}

/// Everything analysis produced for one translation unit.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub scopes: ScopeTree,
    pub types: TypeRegistry,
    pub semantic: SemanticInfo,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs both analysis passes in order.
pub struct Analyzer;

impl Analyzer {
    pub fn analyze(ast: &Ast) -> AnalysisOutput {
        let mut diagnostics = DiagnosticEngine::new();
        let mut types = TypeRegistry::new();

        let mut scopes = ScopeResolver::new(&mut types, &mut diagnostics).run(ast);
        let semantic = TypeChecker::new(&mut scopes, &types, &mut diagnostics).run(ast);

        AnalysisOutput {
            scopes,
            types,
            semantic,
            diagnostics: diagnostics.into_diagnostics(),
        }
    }
}
