//! The parse-tree contract between the front end and the AST builder.
//!
//! The builder consumes nothing but this structure: per node a rule or
//! terminal kind, the literal text for terminals and type specifiers, an
//! ordered child list, and a line/column span. Any front end that produces
//! this shape works; the bundled recursive-descent parser is one such
//! producer.

use std::num::NonZeroU32;

use thin_vec::ThinVec;

use crate::ast::NameId;
use crate::source::SourceSpan;

/// Reference to a node in the flattened parse-tree storage.
pub type ParseNodeRef = NonZeroU32;

/// Grammar rules and terminal kinds.
///
/// The expression tiers (`OrExpr` through `MultExpr`) appear only for actual
/// operator chains: their children are operand sub-trees interleaved with
/// `Operator` terminals, exactly as the grammar matched them, left to right.
/// A tier that matched a single operand contributes no node of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Specification,
    Module,
    /// A struct definition, or a body-less forward declaration when only the
    /// identifier child is present.
    StructType,
    /// One member declaration: a `TypeSpec` child followed by declarators.
    Member,
    /// The declared type's spelling, tokens concatenated (`unsignedshort`,
    /// `A::B`). Carries text, no children.
    TypeSpec,
    /// `ID` optionally followed by one initializer expression child.
    SimpleDeclarator,
    /// `ID`, the bound expression, then zero or more element initializers.
    ArrayDeclarator,
    OrExpr,
    XorExpr,
    AndExpr,
    ShiftExpr,
    AddExpr,
    MultExpr,
    /// A prefix operator applied to a literal: `Operator` child then the
    /// literal terminal.
    UnaryExpr,
    // Terminals.
    Identifier,
    Operator,
    IntegerLit,
    FloatLit,
    CharLit,
    StringLit,
    BooleanLit,
}

/// A single parse-tree node.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub rule: Rule,
    /// Literal text for terminals and type specifiers; `None` elsewhere.
    pub text: Option<NameId>,
    pub children: ThinVec<ParseNodeRef>,
    pub span: SourceSpan,
}

impl ParseNode {
    pub fn new(rule: Rule, span: SourceSpan) -> Self {
        ParseNode {
            rule,
            text: None,
            children: ThinVec::new(),
            span,
        }
    }

    pub fn terminal(rule: Rule, text: NameId, span: SourceSpan) -> Self {
        ParseNode {
            rule,
            text: Some(text),
            children: ThinVec::new(),
            span,
        }
    }
}

/// The flattened parse-tree storage produced by the front end.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: Option<ParseNodeRef>,
}

impl ParseTree {
    pub fn new() -> Self {
        ParseTree::default()
    }

    pub fn push_node(&mut self, node: ParseNode) -> ParseNodeRef {
        let index = self.nodes.len() as u32 + 1;
        self.nodes.push(node);
        ParseNodeRef::new(index).expect("ParseNodeRef overflow")
    }

    pub fn get(&self, node_ref: ParseNodeRef) -> &ParseNode {
        &self.nodes[(node_ref.get() - 1) as usize]
    }

    pub fn root(&self) -> Option<ParseNodeRef> {
        self.root
    }

    pub fn set_root(&mut self, root: ParseNodeRef) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
