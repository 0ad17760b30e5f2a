//! C++ declaration emission.
//!
//! A pure function of the analyzed AST and its attached semantic side
//! table: no re-validation happens here, and emission is best-effort even
//! over a diagnostic-bearing tree. Modules become namespaces, structs
//! become `typedef struct` blocks with a trailing alias, and members map
//! their source type spelling through a fixed table. Indentation is one tab
//! per nesting level; output is deterministic.

use crate::ast::{Ast, NodeKind, NodeRef};

pub struct CppGenerator;

impl CppGenerator {
    /// Emit the whole translation unit. Top-level blocks are separated by a
    /// blank line.
    pub fn generate(ast: &Ast) -> String {
        let Some(root) = ast.root() else {
            return String::new();
        };
        let blocks: Vec<String> = ast
            .get(root)
            .children
            .iter()
            .map(|&child| Self::emit_definition(ast, child, 0))
            .collect();
        blocks.join("\n")
    }

    fn emit_definition(ast: &Ast, node_ref: NodeRef, depth: usize) -> String {
        match ast.get(node_ref).kind {
            NodeKind::Module(name) => {
                let indent = "\t".repeat(depth);
                let mut out = format!("{indent}namespace {name}\n{indent}{{\n");
                for &child in ast.get(node_ref).children.iter() {
                    out.push_str(&Self::emit_definition(ast, child, depth + 1));
                }
                out.push_str(&format!("{indent}}}\n"));
                out
            }
            NodeKind::Struct(name) => {
                let indent = "\t".repeat(depth);
                let mut out = format!("{indent}typedef struct {name}\n{indent}{{\n");
                for &child in ast.get(node_ref).children.iter() {
                    out.push_str(&Self::emit_member(ast, child, depth + 1));
                }
                out.push_str(&format!("{indent}}}{name};\n"));
                out
            }
            _ => String::new(),
        }
    }

    fn emit_member(ast: &Ast, member_ref: NodeRef, depth: usize) -> String {
        let NodeKind::Member(type_text) = ast.get(member_ref).kind else {
            return String::new();
        };
        let indent = "\t".repeat(depth);
        let mapped = map_type(type_text.as_str());
        let declarators: Vec<String> = ast
            .get(member_ref)
            .children
            .iter()
            .map(|&decl| Self::emit_declarator(ast, decl))
            .collect();
        format!("{indent}{mapped} {};\n", declarators.join(", "))
    }

    fn emit_declarator(ast: &Ast, decl_ref: NodeRef) -> String {
        let NodeKind::Declarator { name, is_array } = ast.get(decl_ref).kind else {
            return String::new();
        };
        let children = &ast.get(decl_ref).children;
        let suppressed = ast.initializer_suppressed(decl_ref);

        if !is_array {
            match children.first() {
                Some(&init) if !suppressed => {
                    format!("{} = {}", name, Self::emit_expr(ast, init))
                }
                _ => name.to_string(),
            }
        } else {
            // The bound is part of the declared shape and always emitted;
            // only the element list is subject to suppression.
            let bound = match children.first() {
                Some(&bound) => Self::emit_expr(ast, bound),
                None => String::new(),
            };
            let mut out = format!("{}[{}]", name, bound);
            if children.len() > 1 && !suppressed {
                let elements: Vec<String> = children[1..]
                    .iter()
                    .map(|&element| Self::emit_expr(ast, element))
                    .collect();
                out.push_str(&format!(" = [{}]", elements.join(", ")));
            }
            out
        }
    }

    fn emit_expr(ast: &Ast, expr_ref: NodeRef) -> String {
        let node = ast.get(expr_ref);
        match node.kind {
            NodeKind::Binary(op) => {
                let lhs = Self::emit_expr(ast, node.children[0]);
                let rhs = Self::emit_expr(ast, node.children[1]);
                format!("{} {} {}", lhs, op, rhs)
            }
            NodeKind::Unary(op) => {
                format!("{}{}", op, Self::emit_expr(ast, node.children[0]))
            }
            NodeKind::Literal(_, text) => text.to_string(),
            _ => String::new(),
        }
    }
}

/// Fixed source-spelling → C++ keyword table. Both spellings of each
/// integer width normalize to one keyword; unknown spellings (struct types)
/// pass through verbatim.
fn map_type(text: &str) -> &str {
    match text {
        "short" | "int16" => "short",
        "long" | "int32" => "int",
        "longlong" | "int64" => "long long",
        "unsignedshort" | "uint16" => "unsigned short",
        "unsignedlong" | "uint32" => "unsigned int",
        "unsignedlonglong" | "uint64" => "unsigned long long",
        "float" => "float",
        "double" => "double",
        "longdouble" => "long double",
        "char" => "char",
        "string" => "string",
        "boolean" => "bool",
        other => other,
    }
}
