//! Plain-text AST dumper.
//!
//! Pre-order, one node per line, one tab per nesting level. Useful for
//! debugging and for the driver's `--dump-ast` output.

use crate::ast::{Ast, Node, NodeKind};

pub struct AstDumper;

impl AstDumper {
    /// Render the whole tree. Children are visited in source order; the
    /// work stack is pushed in reverse to preserve that order when popping.
    pub fn dump(ast: &Ast) -> String {
        let mut out = String::new();
        let Some(root) = ast.root() else {
            return out;
        };

        let mut stack = vec![(root, 0usize)];
        while let Some((node_ref, level)) = stack.pop() {
            let node = ast.get(node_ref);
            for _ in 0..level {
                out.push('\t');
            }
            out.push_str(&Self::label(node));
            out.push('\n');

            for &child in node.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }
        out
    }

    fn label(node: &Node) -> String {
        match node.kind {
            NodeKind::Specification => "Specification".to_string(),
            NodeKind::Module(name) => format!("Module_{}", name),
            NodeKind::Struct(name) => format!("Struct_{}", name),
            NodeKind::Member(type_text) => format!("Member_Type({})", type_text),
            NodeKind::Declarator { name, is_array } => {
                if is_array {
                    format!("Array_{}", name)
                } else {
                    format!("Variable_{}", name)
                }
            }
            NodeKind::Binary(op) => op.symbol().to_string(),
            NodeKind::Unary(op) => op.symbol().to_string(),
            NodeKind::Literal(kind, text) => format!("({}):{}", kind, text),
        }
    }
}
