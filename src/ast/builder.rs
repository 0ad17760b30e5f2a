//! Builds the typed AST from a parse tree.
//!
//! One AST node per significant production, children in source order, parent
//! back-reference wired on every child. The expression tiers arrive as flat
//! operand/operator lists and are folded here into strictly left-associative
//! binary trees; a folded node's span runs from its left operand's start to
//! its right operand's end.
//!
//! A malformed parse tree is a contract violation by the front end, not a
//! condition this layer recovers from.

use crate::ast::{Ast, BinaryOp, ConstantKind, NameId, NodeKind, NodeRef, UnaryOp};
use crate::parse_tree::{ParseNodeRef, ParseTree, Rule};
use crate::source::SourceSpan;

/// Converts a [`ParseTree`] into an [`Ast`].
pub struct AstBuilder<'t> {
    tree: &'t ParseTree,
    ast: Ast,
}

impl<'t> AstBuilder<'t> {
    pub fn build(tree: &'t ParseTree) -> Ast {
        let mut builder = AstBuilder {
            tree,
            ast: Ast::new(),
        };
        if let Some(root) = tree.root() {
            let spec = builder.build_specification(root);
            builder.ast.set_root(spec);
        }
        builder.ast
    }

    fn children(&self, node: ParseNodeRef) -> Vec<ParseNodeRef> {
        self.tree.get(node).children.iter().copied().collect()
    }

    fn rule(&self, node: ParseNodeRef) -> Rule {
        self.tree.get(node).rule
    }

    fn span(&self, node: ParseNodeRef) -> SourceSpan {
        self.tree.get(node).span
    }

    fn text(&self, node: ParseNodeRef) -> NameId {
        self.tree
            .get(node)
            .text
            .expect("parse-tree contract: terminal carries text")
    }

    fn build_specification(&mut self, node: ParseNodeRef) -> NodeRef {
        let spec = self
            .ast
            .push_node(NodeKind::Specification, self.span(node));
        for child in self.children(node) {
            let built = self.build_definition(child);
            self.ast.add_child(spec, built);
        }
        spec
    }

    fn build_definition(&mut self, node: ParseNodeRef) -> NodeRef {
        match self.rule(node) {
            Rule::Module => self.build_module(node),
            Rule::StructType => self.build_struct(node),
            rule => panic!("parse-tree contract: unexpected definition rule {rule:?}"),
        }
    }

    fn build_module(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let name = self.text(children[0]);
        let module = self
            .ast
            .push_node(NodeKind::Module(name), self.span(node));
        for &child in &children[1..] {
            let built = self.build_definition(child);
            self.ast.add_child(module, built);
        }
        module
    }

    fn build_struct(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let name = self.text(children[0]);
        let strukt = self
            .ast
            .push_node(NodeKind::Struct(name), self.span(node));
        for &child in &children[1..] {
            let built = self.build_member(child);
            self.ast.add_child(strukt, built);
        }
        strukt
    }

    fn build_member(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let type_text = self.text(children[0]);
        let member = self
            .ast
            .push_node(NodeKind::Member(type_text), self.span(node));
        for &child in &children[1..] {
            let built = self.build_declarator(child);
            self.ast.add_child(member, built);
        }
        member
    }

    fn build_declarator(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let name = self.text(children[0]);
        let is_array = match self.rule(node) {
            Rule::SimpleDeclarator => false,
            Rule::ArrayDeclarator => true,
            rule => panic!("parse-tree contract: unexpected declarator rule {rule:?}"),
        };
        let declarator = self
            .ast
            .push_node(NodeKind::Declarator { name, is_array }, self.span(node));
        for &child in &children[1..] {
            let built = self.build_expr(child);
            self.ast.add_child(declarator, built);
        }
        declarator
    }

    fn build_expr(&mut self, node: ParseNodeRef) -> NodeRef {
        match self.rule(node) {
            Rule::OrExpr
            | Rule::XorExpr
            | Rule::AndExpr
            | Rule::ShiftExpr
            | Rule::AddExpr
            | Rule::MultExpr => self.fold_chain(node),
            Rule::UnaryExpr => self.build_unary(node),
            Rule::IntegerLit => self.build_literal(node, ConstantKind::Integer),
            Rule::FloatLit => self.build_literal(node, ConstantKind::Float),
            Rule::CharLit => self.build_literal(node, ConstantKind::Char),
            Rule::StringLit => self.build_literal(node, ConstantKind::String),
            Rule::BooleanLit => self.build_literal(node, ConstantKind::Boolean),
            rule => panic!("parse-tree contract: unexpected expression rule {rule:?}"),
        }
    }

    /// Fold a flat `operand (operator operand)*` chain into a
    /// left-associative tree, two operands at a time.
    fn fold_chain(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let mut iter = children.into_iter();
        let first = iter.next().expect("parse-tree contract: chain has operands");
        let mut acc = self.build_expr(first);

        while let Some(op_node) = iter.next() {
            let rhs_node = iter
                .next()
                .expect("parse-tree contract: operator has a right operand");
            let op = binary_op(self.text(op_node).as_str());
            let rhs = self.build_expr(rhs_node);

            let span = self.ast.get(acc).span.to(self.ast.get(rhs).span);
            let folded = self.ast.push_node(NodeKind::Binary(op), span);
            self.ast.add_child(folded, acc);
            self.ast.add_child(folded, rhs);
            acc = folded;
        }
        acc
    }

    fn build_unary(&mut self, node: ParseNodeRef) -> NodeRef {
        let children = self.children(node);
        let op = unary_op(self.text(children[0]).as_str());
        let unary = self
            .ast
            .push_node(NodeKind::Unary(op), self.span(node));
        let operand = self.build_expr(children[1]);
        self.ast.add_child(unary, operand);
        unary
    }

    fn build_literal(&mut self, node: ParseNodeRef, kind: ConstantKind) -> NodeRef {
        let text = self.text(node);
        self.ast
            .push_node(NodeKind::Literal(kind, text), self.span(node))
    }
}

fn binary_op(text: &str) -> BinaryOp {
    match text {
        "|" => BinaryOp::Or,
        "^" => BinaryOp::Xor,
        "&" => BinaryOp::And,
        "<<" => BinaryOp::LShift,
        ">>" => BinaryOp::RShift,
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        other => panic!("parse-tree contract: unknown binary operator {other:?}"),
    }
}

fn unary_op(text: &str) -> UnaryOp {
    match text {
        "+" => UnaryOp::Plus,
        "-" => UnaryOp::Minus,
        "~" => UnaryOp::Invert,
        other => panic!("parse-tree contract: unknown unary operator {other:?}"),
    }
}
