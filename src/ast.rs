//! Abstract Syntax Tree for the MIDL compiler.
//!
//! The AST uses flattened storage: all nodes live in one contiguous vector
//! and refer to each other through index-based [`NodeRef`]s. Every non-root
//! node carries a parent back-reference as an index (never an owning
//! pointer), so the tree stays singly-owned top-down while still supporting
//! upward navigation.
//!
//! The tree is immutable after construction; semantic analysis attaches a
//! side table ([`SemanticInfo`](crate::semantic::SemanticInfo)) rather than
//! rewriting nodes.

use std::num::NonZeroU32;

use thin_vec::ThinVec;

use crate::semantic::SemanticInfo;
use crate::source::SourceSpan;

/// An interned string. Alias for `GlobalSymbol` from the `symbol_table`
/// crate with the `global` feature.
pub type NameId = symbol_table::GlobalSymbol;

pub mod builder;
pub mod dumper;
pub mod nodes;

pub use nodes::{BinaryOp, ConstantKind, NodeKind, UnaryOp};

#[cfg(test)]
mod tests_builder;

/// Reference to a node in the flattened AST storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(NonZeroU32);

impl NodeRef {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        (self.get() - 1) as usize
    }
}

/// A single AST node: kind payload, source span, parent back-reference and
/// ordered children.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: SourceSpan,
    pub parent: Option<NodeRef>,
    pub children: ThinVec<NodeRef>,
}

/// The flattened AST storage.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeRef>,
    /// Side table attached after semantic analysis.
    pub semantic: Option<SemanticInfo>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    /// Add a childless node and return its reference.
    pub fn push_node(&mut self, kind: NodeKind, span: SourceSpan) -> NodeRef {
        let index = self.nodes.len() as u32 + 1;
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            children: ThinVec::new(),
        });
        NodeRef::new(index).expect("NodeRef overflow")
    }

    /// Append `child` to `parent`'s child list and set the back-reference.
    pub fn add_child(&mut self, parent: NodeRef, child: NodeRef) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn get(&self, node_ref: NodeRef) -> &Node {
        &self.nodes[node_ref.index()]
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeRef) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach the semantic side table produced by analysis.
    pub fn attach_semantic_info(&mut self, semantic: SemanticInfo) {
        self.semantic = Some(semantic);
    }

    /// Whether analysis rejected this declarator's initializer. Nodes without
    /// an attached side table are never suppressed.
    pub fn initializer_suppressed(&self, declarator: NodeRef) -> bool {
        self.semantic
            .as_ref()
            .is_some_and(|info| info.suppressed_initializers.contains(&declarator))
    }
}
