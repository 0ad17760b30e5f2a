//! Pass 1: scope resolution.
//!
//! Walks the AST with an explicit work stack, building the scope tree that
//! mirrors module/struct nesting, reporting duplicate identifiers, and
//! registering every struct as a custom type under its fully qualified
//! name. A duplicate's subtree is not descended into, so its contents
//! produce no follow-on noise.

use log::debug;

use crate::ast::{Ast, NameId, NodeKind, NodeRef};
use crate::diagnostic::{DiagnosticEngine, SemanticError};
use crate::semantic::scope::{IdentifierKind, ScopeId, ScopeTree};
use crate::semantic::types::TypeRegistry;

pub struct ScopeResolver<'a> {
    types: &'a mut TypeRegistry,
    diagnostics: &'a mut DiagnosticEngine,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(types: &'a mut TypeRegistry, diagnostics: &'a mut DiagnosticEngine) -> Self {
        ScopeResolver { types, diagnostics }
    }

    /// Build the scope tree for `ast`.
    pub fn run(mut self, ast: &Ast) -> ScopeTree {
        let mut scopes = ScopeTree::new();
        let Some(root) = ast.root() else {
            return scopes;
        };

        // Children pushed in reverse so siblings pop in source order.
        let mut stack: Vec<(ScopeId, NodeRef)> = Vec::new();
        for &child in ast.get(root).children.iter().rev() {
            stack.push((ScopeId::ROOT, child));
        }

        while let Some((scope_id, node_ref)) = stack.pop() {
            let node = ast.get(node_ref);
            match node.kind {
                NodeKind::Module(name) => {
                    self.enter_scope(
                        ast,
                        &mut scopes,
                        &mut stack,
                        scope_id,
                        node_ref,
                        name,
                        IdentifierKind::Module,
                    );
                }
                NodeKind::Struct(name) => {
                    self.enter_scope(
                        ast,
                        &mut scopes,
                        &mut stack,
                        scope_id,
                        node_ref,
                        name,
                        IdentifierKind::Struct,
                    );
                }
                _ => {
                    for &child in node.children.iter().rev() {
                        stack.push((scope_id, child));
                    }
                }
            }
        }
        scopes
    }

    #[allow(clippy::too_many_arguments)]
    fn enter_scope(
        &mut self,
        ast: &Ast,
        scopes: &mut ScopeTree,
        stack: &mut Vec<(ScopeId, NodeRef)>,
        scope_id: ScopeId,
        node_ref: NodeRef,
        name: NameId,
        kind: IdentifierKind,
    ) {
        let node = ast.get(node_ref);
        if scopes.is_defined(scope_id, name) {
            debug!("duplicate {:?} '{}' dropped", kind, name);
            self.diagnostics.report(SemanticError::DuplicateIdentifier {
                name,
                scope: scopes.get(scope_id).name,
                pos: node.span.start,
            });
            return;
        }

        scopes.register(scope_id, name, kind);
        if kind == IdentifierKind::Struct {
            let qualified = format!("{}{}", scopes.qualified_prefix(scope_id), name);
            debug!("registered struct type '{}'", qualified);
            self.types.register_custom(NameId::new(&qualified));
        }

        let child_scope = scopes.push_scope(scope_id, name);
        scopes.record_node_scope(node_ref, child_scope);
        for &child in node.children.iter().rev() {
            stack.push((child_scope, child));
        }
    }
}
