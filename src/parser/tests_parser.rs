#![cfg(test)]
use crate::diagnostic::ParseError;
use crate::lexer::Lexer;
use crate::parse_tree::{ParseNodeRef, ParseTree, Rule};
use crate::parser::Parser;

fn parse(source: &str) -> ParseTree {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    Parser::new(tokens).parse().expect("parsing failed")
}

fn parse_err(source: &str) -> ParseError {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    Parser::new(tokens).parse().unwrap_err()
}

fn child(tree: &ParseTree, node: ParseNodeRef, index: usize) -> ParseNodeRef {
    tree.get(node).children[index]
}

fn text(tree: &ParseTree, node: ParseNodeRef) -> String {
    tree.get(node).text.expect("node carries text").to_string()
}

#[test]
fn module_nesting() {
    let tree = parse("module A { module B { struct S; }; };");
    let root = tree.root().expect("root");
    assert_eq!(tree.get(root).rule, Rule::Specification);

    let module_a = child(&tree, root, 0);
    assert_eq!(tree.get(module_a).rule, Rule::Module);
    assert_eq!(text(&tree, child(&tree, module_a, 0)), "A");

    let module_b = child(&tree, module_a, 1);
    assert_eq!(tree.get(module_b).rule, Rule::Module);

    let struct_s = child(&tree, module_b, 1);
    assert_eq!(tree.get(struct_s).rule, Rule::StructType);
    // Forward declaration: identifier only, no members.
    assert_eq!(tree.get(struct_s).children.len(), 1);
}

#[test]
fn struct_members_pair_type_and_declarators() {
    let tree = parse("struct Point { long x; unsigned short y, z; };");
    let root = tree.root().expect("root");
    let point = child(&tree, root, 0);
    assert_eq!(tree.get(point).rule, Rule::StructType);
    assert_eq!(tree.get(point).children.len(), 3); // ident + two members

    let first = child(&tree, point, 1);
    assert_eq!(tree.get(first).rule, Rule::Member);
    assert_eq!(text(&tree, child(&tree, first, 0)), "long");
    assert_eq!(tree.get(first).children.len(), 2);

    let second = child(&tree, point, 2);
    assert_eq!(text(&tree, child(&tree, second, 0)), "unsignedshort");
    assert_eq!(tree.get(second).children.len(), 3); // type spec + y + z
}

#[test]
fn scoped_type_name_concatenates() {
    let tree = parse("struct S { A::B::C item; };");
    let root = tree.root().expect("root");
    let s = child(&tree, root, 0);
    let member = child(&tree, s, 1);
    assert_eq!(text(&tree, child(&tree, member, 0)), "A::B::C");
}

#[test]
fn operator_chain_stays_flat() {
    let tree = parse("struct S { long x = 1 + 2 - 3; };");
    let root = tree.root().expect("root");
    let member = child(&tree, child(&tree, root, 0), 1);
    let declarator = child(&tree, member, 1);
    assert_eq!(tree.get(declarator).rule, Rule::SimpleDeclarator);

    let chain = child(&tree, declarator, 1);
    assert_eq!(tree.get(chain).rule, Rule::AddExpr);
    let kids = &tree.get(chain).children;
    // operand, '+', operand, '-', operand
    assert_eq!(kids.len(), 5);
    assert_eq!(tree.get(kids[1]).rule, Rule::Operator);
    assert_eq!(text(&tree, kids[1]), "+");
    assert_eq!(tree.get(kids[3]).rule, Rule::Operator);
    assert_eq!(text(&tree, kids[3]), "-");
}

#[test]
fn single_operand_tier_adds_no_wrapper() {
    let tree = parse("struct S { long x = 5; };");
    let root = tree.root().expect("root");
    let member = child(&tree, child(&tree, root, 0), 1);
    let declarator = child(&tree, member, 1);
    let init = child(&tree, declarator, 1);
    assert_eq!(tree.get(init).rule, Rule::IntegerLit);
    assert_eq!(text(&tree, init), "5");
}

#[test]
fn array_declarator_children() {
    let tree = parse("struct S { short vals[3] = [1, 2, 3]; };");
    let root = tree.root().expect("root");
    let member = child(&tree, child(&tree, root, 0), 1);
    let declarator = child(&tree, member, 1);
    assert_eq!(tree.get(declarator).rule, Rule::ArrayDeclarator);
    // ident, bound, three elements
    assert_eq!(tree.get(declarator).children.len(), 5);
}

#[test]
fn unary_wraps_literal() {
    let tree = parse("struct S { float x = ~2.0; };");
    let root = tree.root().expect("root");
    let member = child(&tree, child(&tree, root, 0), 1);
    let declarator = child(&tree, member, 1);
    let unary = child(&tree, declarator, 1);
    assert_eq!(tree.get(unary).rule, Rule::UnaryExpr);
    assert_eq!(text(&tree, child(&tree, unary, 0)), "~");
    assert_eq!(tree.get(child(&tree, unary, 1)).rule, Rule::FloatLit);
}

#[test]
fn missing_semicolon_is_an_error() {
    let err = parse_err("module A { struct S; }");
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn missing_member_semicolon_is_an_error() {
    let err = parse_err("struct S { long x };");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn member_spans_cover_type_through_last_declarator() {
    let tree = parse("struct S {\n  long x, y;\n};");
    let root = tree.root().expect("root");
    let member = child(&tree, child(&tree, root, 0), 1);
    let span = tree.get(member).span;
    assert_eq!((span.start.line, span.start.column), (2, 3));
    assert_eq!((span.end.line, span.end.column), (2, 11));
}
