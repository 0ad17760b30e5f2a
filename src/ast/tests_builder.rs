#![cfg(test)]
use crate::ast::builder::AstBuilder;
use crate::ast::dumper::AstDumper;
use crate::ast::{Ast, BinaryOp, ConstantKind, NodeKind, NodeRef, UnaryOp};
use crate::lexer::Lexer;
use crate::parser::Parser;

fn build(source: &str) -> Ast {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    let tree = Parser::new(tokens).parse().expect("parsing failed");
    AstBuilder::build(&tree)
}

fn child(ast: &Ast, node: NodeRef, index: usize) -> NodeRef {
    ast.get(node).children[index]
}

/// First initializer expression of the first declarator of the first member
/// of the first struct.
fn first_initializer(ast: &Ast) -> NodeRef {
    let root = ast.root().expect("root");
    let strukt = child(ast, root, 0);
    let member = child(ast, strukt, 0);
    let declarator = child(ast, member, 0);
    child(ast, declarator, 0)
}

fn literal_text(ast: &Ast, node: NodeRef) -> String {
    match ast.get(node).kind {
        NodeKind::Literal(_, text) => text.to_string(),
        other => panic!("expected literal, got {other:?}"),
    }
}

#[test]
fn same_precedence_folds_left_associative() {
    let ast = build("struct S { long x = 1 + 2 - 3; };");
    let expr = first_initializer(&ast);

    assert_eq!(ast.get(expr).kind, NodeKind::Binary(BinaryOp::Sub));
    let lhs = child(&ast, expr, 0);
    assert_eq!(ast.get(lhs).kind, NodeKind::Binary(BinaryOp::Add));
    assert_eq!(literal_text(&ast, child(&ast, lhs, 0)), "1");
    assert_eq!(literal_text(&ast, child(&ast, lhs, 1)), "2");
    assert_eq!(literal_text(&ast, child(&ast, expr, 1)), "3");
}

#[test]
fn precedence_tiers_nest() {
    let ast = build("struct S { short x = 2 + 5 * 2 / 3; };");
    let expr = first_initializer(&ast);

    // + at the top, the multiplicative chain folded below its right side.
    assert_eq!(ast.get(expr).kind, NodeKind::Binary(BinaryOp::Add));
    assert_eq!(literal_text(&ast, child(&ast, expr, 0)), "2");

    let rhs = child(&ast, expr, 1);
    assert_eq!(ast.get(rhs).kind, NodeKind::Binary(BinaryOp::Div));
    let mul = child(&ast, rhs, 0);
    assert_eq!(ast.get(mul).kind, NodeKind::Binary(BinaryOp::Mul));
    assert_eq!(literal_text(&ast, child(&ast, mul, 0)), "5");
    assert_eq!(literal_text(&ast, child(&ast, mul, 1)), "2");
    assert_eq!(literal_text(&ast, child(&ast, rhs, 1)), "3");
}

#[test]
fn folded_expression_spans_cover_operands() {
    let ast = build("struct S { long x = 1 + 2 - 3; };");
    let expr = first_initializer(&ast);
    let span = ast.get(expr).span;
    assert_eq!((span.start.line, span.start.column), (1, 21));
    assert_eq!((span.end.line, span.end.column), (1, 29));

    let lhs = child(&ast, expr, 0);
    let inner = ast.get(lhs).span;
    assert_eq!((inner.start.line, inner.start.column), (1, 21));
    assert_eq!((inner.end.line, inner.end.column), (1, 25));
}

#[test]
fn unary_wraps_single_literal() {
    let ast = build("struct S { float x = ~2.0; };");
    let expr = first_initializer(&ast);
    assert_eq!(ast.get(expr).kind, NodeKind::Unary(UnaryOp::Invert));
    let operand = child(&ast, expr, 0);
    assert!(matches!(
        ast.get(operand).kind,
        NodeKind::Literal(ConstantKind::Float, _)
    ));
}

#[test]
fn declarator_children_layout() {
    let ast = build("struct S { long a; long b = 5; short c[3] = [1, 2, 3]; };");
    let root = ast.root().expect("root");
    let strukt = child(&ast, root, 0);

    let plain = child(&ast, child(&ast, strukt, 0), 0);
    assert_eq!(ast.get(plain).children.len(), 0);

    let initialized = child(&ast, child(&ast, strukt, 1), 0);
    assert_eq!(ast.get(initialized).children.len(), 1);

    let array = child(&ast, child(&ast, strukt, 2), 0);
    assert!(matches!(
        ast.get(array).kind,
        NodeKind::Declarator { is_array: true, .. }
    ));
    // bound + three elements
    assert_eq!(ast.get(array).children.len(), 4);
}

#[test]
fn every_non_root_node_has_one_parent() {
    let ast = build("module A { struct S { short v[2] = [1, 2 + 3]; }; };");
    let root = ast.root().expect("root");
    assert_eq!(ast.get(root).parent, None);

    let mut stack = vec![root];
    let mut visited = 0usize;
    while let Some(node_ref) = stack.pop() {
        visited += 1;
        for &c in ast.get(node_ref).children.iter() {
            assert_eq!(ast.get(c).parent, Some(node_ref));
            stack.push(c);
        }
    }
    // The tree owns each node exactly once.
    assert_eq!(visited, ast.len());
}

#[test]
fn dump_layout() {
    let ast = build("module Geo { struct Point { long x = 5; short arr[2] = [1, 2]; }; };");
    let dump = AstDumper::dump(&ast);
    let expected = "Specification\n\
                    \tModule_Geo\n\
                    \t\tStruct_Point\n\
                    \t\t\tMember_Type(long)\n\
                    \t\t\t\tVariable_x\n\
                    \t\t\t\t\t(Integer):5\n\
                    \t\t\tMember_Type(short)\n\
                    \t\t\t\tArray_arr\n\
                    \t\t\t\t\t(Integer):2\n\
                    \t\t\t\t\t(Integer):1\n\
                    \t\t\t\t\t(Integer):2\n";
    assert_eq!(dump, expected);
}
