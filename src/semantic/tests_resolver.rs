#![cfg(test)]
use crate::ast::builder::AstBuilder;
use crate::ast::{Ast, NameId};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantic::{AnalysisOutput, Analyzer, IdentifierKind, ScopeId};

fn analyze(source: &str) -> (Ast, AnalysisOutput) {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    let tree = Parser::new(tokens).parse().expect("parsing failed");
    let ast = AstBuilder::build(&tree);
    let output = Analyzer::analyze(&ast);
    (ast, output)
}

#[test]
fn scope_tree_mirrors_nesting_depth() {
    let (_, output) = analyze("module A { module B { struct S; }; };");
    let scopes = &output.scopes;
    // root + A + B + S
    assert_eq!(scopes.len(), 4);

    let root = scopes.get(ScopeId::ROOT);
    assert_eq!(root.level, 0);
    assert_eq!(root.parent, None);

    let a = root.children[&NameId::new("A")];
    assert_eq!(scopes.get(a).level, 1);
    let b = scopes.get(a).children[&NameId::new("B")];
    assert_eq!(scopes.get(b).level, 2);
    let s = scopes.get(b).children[&NameId::new("S")];
    assert_eq!(scopes.get(s).level, 3);
}

#[test]
fn duplicate_sibling_structs_report_once_and_register_once() {
    let (_, output) = analyze("struct Point; struct Point;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].to_string(),
        "[Line 1:15]: The identifier \"Point\" is already defined in scope \"\"."
    );

    // Only one scope entry and one child scope for Point.
    let root = output.scopes.get(ScopeId::ROOT);
    assert_eq!(root.identifiers.len(), 1);
    assert_eq!(
        root.identifiers[&NameId::new("Point")],
        IdentifierKind::Struct
    );
    assert_eq!(output.scopes.len(), 2);
}

#[test]
fn duplicate_module_subtree_is_not_descended() {
    let (_, output) = analyze("module M { struct S; }; module M { struct T; };");
    // One diagnostic for M; nothing from inside the duplicate.
    assert_eq!(output.diagnostics.len(), 1);

    // S was registered, T never was.
    assert!(output.scopes.search_struct(ScopeId::ROOT, "M::S"));
    assert!(!output.scopes.search_struct(ScopeId::ROOT, "M::T"));
    // root + M + S
    assert_eq!(output.scopes.len(), 3);
}

#[test]
fn struct_types_register_under_qualified_names() {
    let (_, output) = analyze("module A { module inner { struct S; }; struct T; };");
    assert!(output.types.contains_custom(NameId::new("A::inner::S")));
    assert!(output.types.contains_custom(NameId::new("A::T")));
    assert!(!output.types.contains_custom(NameId::new("S")));
}

#[test]
fn module_and_struct_share_one_namespace_per_scope() {
    let (_, output) = analyze("module X { struct Y; }; struct X;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].to_string(),
        "[Line 1:25]: The identifier \"X\" is already defined in scope \"\"."
    );
}
