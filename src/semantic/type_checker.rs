//! Pass 2: type checking.
//!
//! Walks the AST again over the completed scope tree. Members resolve their
//! type spelling against the primitive table, the registered struct types,
//! and finally the scope chain; declarators get duplicate checks and their
//! constant initializers are validated against the resolved type.
//!
//! Every violation is local: report, skip the construct, continue with the
//! siblings. A declarator whose initializer fails any constant check is
//! recorded in the semantic side table so code generation emits it bare.

use hashbrown::HashSet;
use log::debug;

use crate::ast::{Ast, ConstantKind, NameId, NodeKind, NodeRef};
use crate::diagnostic::{DiagnosticEngine, SemanticError};
use crate::semantic::scope::{IdentifierKind, ScopeId, ScopeTree};
use crate::semantic::types::{SystemType, TypeRegistry};
use crate::semantic::SemanticInfo;

pub struct TypeChecker<'a> {
    scopes: &'a mut ScopeTree,
    types: &'a TypeRegistry,
    diagnostics: &'a mut DiagnosticEngine,
    suppressed: HashSet<NodeRef>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        scopes: &'a mut ScopeTree,
        types: &'a TypeRegistry,
        diagnostics: &'a mut DiagnosticEngine,
    ) -> Self {
        TypeChecker {
            scopes,
            types,
            diagnostics,
            suppressed: HashSet::new(),
        }
    }

    /// Check the whole tree and return the semantic side table.
    pub fn run(mut self, ast: &Ast) -> SemanticInfo {
        let Some(root) = ast.root() else {
            return SemanticInfo::default();
        };

        let mut stack: Vec<(ScopeId, NodeRef)> = Vec::new();
        for &child in ast.get(root).children.iter().rev() {
            stack.push((ScopeId::ROOT, child));
        }

        while let Some((scope_id, node_ref)) = stack.pop() {
            let node = ast.get(node_ref);
            match node.kind {
                NodeKind::Module(_) | NodeKind::Struct(_) => {
                    // A node pass 1 refused (duplicate) has no scope; its
                    // subtree was never registered, so skip it wholesale.
                    if let Some(inner) = self.scopes.node_scope(node_ref) {
                        for &child in node.children.iter().rev() {
                            stack.push((inner, child));
                        }
                    }
                }
                NodeKind::Member(type_text) => {
                    self.check_member(ast, scope_id, node_ref, type_text);
                }
                _ => {
                    for &child in node.children.iter().rev() {
                        stack.push((scope_id, child));
                    }
                }
            }
        }

        SemanticInfo {
            suppressed_initializers: self.suppressed,
        }
    }

    /// Resolve a member's type spelling: primitives, then registered struct
    /// types by fully qualified name, then the scope chain for a
    /// (possibly qualified) struct name relative to the current scope.
    fn resolve_member_type(&self, scope_id: ScopeId, text: NameId) -> Option<SystemType> {
        if let Some(ty) = self.types.lookup(text.as_str()) {
            return Some(ty);
        }
        if self.scopes.search_struct(scope_id, text.as_str()) {
            return Some(SystemType::Custom(text));
        }
        None
    }

    fn check_member(&mut self, ast: &Ast, scope_id: ScopeId, member_ref: NodeRef, type_text: NameId) {
        let member = ast.get(member_ref);
        let Some(ty) = self.resolve_member_type(scope_id, type_text) else {
            self.diagnostics.report(SemanticError::UnresolvedType {
                name: type_text,
                pos: member.span.start,
            });
            return;
        };
        debug!("member type '{}' resolved to {:?}", type_text, ty);

        for &decl_ref in member.children.iter() {
            let decl = ast.get(decl_ref);
            let NodeKind::Declarator { name, is_array } = decl.kind else {
                continue;
            };

            if self.scopes.is_defined(scope_id, name) {
                self.diagnostics.report(SemanticError::DuplicateIdentifier {
                    name,
                    scope: self.scopes.get(scope_id).name,
                    pos: decl.span.start,
                });
                continue;
            }
            self.scopes
                .register(scope_id, name, IdentifierKind::Declaration);

            if is_array {
                self.check_array_declarator(ast, decl_ref, ty, type_text);
            } else {
                self.check_plain_declarator(ast, decl_ref, ty, type_text);
            }
        }
    }

    fn check_plain_declarator(
        &mut self,
        ast: &Ast,
        decl_ref: NodeRef,
        ty: SystemType,
        type_text: NameId,
    ) {
        let decl = ast.get(decl_ref);
        let Some(&init) = decl.children.first() else {
            return;
        };
        if !self.check_initializer(ast, init, ty, type_text) {
            self.suppressed.insert(decl_ref);
        }
    }

    fn check_array_declarator(
        &mut self,
        ast: &Ast,
        decl_ref: NodeRef,
        ty: SystemType,
        type_text: NameId,
    ) {
        let decl = ast.get(decl_ref);
        let Some(&bound) = decl.children.first() else {
            return;
        };

        // Any integer-kind constant expression is a valid bound, not only a
        // literal. A `Never` bound was already reported at its root cause.
        let bound_kind = self.infer_kind(ast, bound);
        if bound_kind != ConstantKind::Integer {
            if bound_kind != ConstantKind::Never {
                self.diagnostics.report(SemanticError::ArrayBoundNotInteger {
                    kind: bound_kind,
                    pos: ast.get(bound).span.start,
                });
            }
            self.suppressed.insert(decl_ref);
            return;
        }

        let mut all_ok = true;
        for &element in &decl.children[1..] {
            if !self.check_initializer(ast, element, ty, type_text) {
                all_ok = false;
            }
        }
        if !all_ok {
            self.suppressed.insert(decl_ref);
        }
    }

    /// Validate one initializer expression against the declared type.
    /// Returns `false` when the initializer must be suppressed; the
    /// diagnostic (if any is owed) has been reported by then.
    fn check_initializer(
        &mut self,
        ast: &Ast,
        expr: NodeRef,
        ty: SystemType,
        type_text: NameId,
    ) -> bool {
        let kind = self.infer_kind(ast, expr);
        if kind == ConstantKind::Never {
            // The operand conflict was already reported; don't cascade.
            return false;
        }
        if !ty.accepts_kind(kind) {
            self.diagnostics.report(SemanticError::ConstantKindMismatch {
                kind,
                type_name: type_text,
                pos: ast.get(expr).span.start,
            });
            return false;
        }
        // Only literal leaves get the value check; folded expressions are
        // exempt (the documented range-checking gap).
        if let NodeKind::Literal(_, text) = ast.get(expr).kind {
            if !ty.accepts_value(text.as_str()) {
                self.diagnostics
                    .report(SemanticError::ConstantValueMismatch {
                        value: text,
                        type_name: type_text,
                        pos: ast.get(expr).span.start,
                    });
                return false;
            }
        }
        true
    }

    /// Bottom-up constant-kind inference. Binary operands must agree;
    /// a disagreement is reported once and yields `Never`, which then
    /// propagates upward silently.
    fn infer_kind(&mut self, ast: &Ast, expr: NodeRef) -> ConstantKind {
        let node = ast.get(expr);
        match node.kind {
            NodeKind::Literal(kind, _) => kind,
            NodeKind::Unary(_) => match node.children.first() {
                Some(&operand) => self.infer_kind(ast, operand),
                None => ConstantKind::Never,
            },
            NodeKind::Binary(op) => {
                let (Some(&lhs), Some(&rhs)) = (node.children.first(), node.children.get(1)) else {
                    return ConstantKind::Never;
                };
                let left = self.infer_kind(ast, lhs);
                let right = self.infer_kind(ast, rhs);
                if left == ConstantKind::Never || right == ConstantKind::Never {
                    return ConstantKind::Never;
                }
                if left != right {
                    self.diagnostics
                        .report(SemanticError::OperatorKindConflict {
                            op,
                            left,
                            right,
                            pos: node.span.start,
                        });
                    return ConstantKind::Never;
                }
                left
            }
            _ => ConstantKind::Never,
        }
    }
}
