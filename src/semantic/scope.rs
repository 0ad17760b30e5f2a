//! Scope tree management.
//!
//! Scopes use flattened storage: all scopes live in one vector and refer to
//! each other through [`ScopeId`] indices. The root scope has id 1, an empty
//! name and no parent. Identifier registration is write-once per scope — a
//! second registration of the same name is a conflict the caller reports,
//! and the second definition is dropped.

use std::num::NonZeroU32;

use hashbrown::HashMap;

use crate::ast::{NameId, NodeRef};

/// Scope ID for index-based scope references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(NonZeroU32);

impl ScopeId {
    pub const ROOT: Self = Self(NonZeroU32::MIN);

    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    fn index(self) -> usize {
        (self.get() - 1) as usize
    }
}

/// What a registered identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Module,
    Struct,
    Declaration,
}

/// One named scope: its identifiers, its child scopes, and a non-owning
/// back-reference to the parent.
#[derive(Debug)]
pub struct Scope {
    pub name: NameId,
    pub parent: Option<ScopeId>,
    pub identifiers: HashMap<NameId, IdentifierKind>,
    pub children: HashMap<NameId, ScopeId>,
    pub level: u32,
}

/// Scope tree using flattened storage.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    /// Which AST node owns which scope. Nodes refused by pass 1 (duplicates)
    /// have no entry, which is how pass 2 knows to skip their subtrees.
    node_scopes: HashMap<NodeRef, ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                name: NameId::new(""),
                parent: None,
                identifiers: HashMap::new(),
                children: HashMap::new(),
                level: 0,
            }],
            node_scopes: HashMap::new(),
        }
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Create a child scope of `parent` named `name` and link both ways.
    pub fn push_scope(&mut self, parent: ScopeId, name: NameId) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32 + 1).expect("ScopeId overflow");
        let level = self.get(parent).level + 1;
        self.scopes.push(Scope {
            name,
            parent: Some(parent),
            identifiers: HashMap::new(),
            children: HashMap::new(),
            level,
        });
        self.get_mut(parent).children.insert(name, id);
        id
    }

    pub fn is_defined(&self, scope: ScopeId, name: NameId) -> bool {
        self.get(scope).identifiers.contains_key(&name)
    }

    pub fn register(&mut self, scope: ScopeId, name: NameId, kind: IdentifierKind) {
        self.get_mut(scope).identifiers.insert(name, kind);
    }

    pub fn record_node_scope(&mut self, node: NodeRef, scope: ScopeId) {
        self.node_scopes.insert(node, scope);
    }

    pub fn node_scope(&self, node: NodeRef) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// The `Outer::Inner::` prefix for names registered inside `scope`;
    /// empty for the root.
    pub fn qualified_prefix(&self, scope: ScopeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if s.parent.is_some() {
                names.push(s.name);
            }
            current = s.parent;
        }
        let mut prefix = String::new();
        for name in names.into_iter().rev() {
            prefix.push_str(name.as_str());
            prefix.push_str("::");
        }
        prefix
    }

    /// Search the scope chain from `from` outward to the root for a
    /// `Struct`-kind identifier along the (possibly `::`-qualified) path.
    pub fn search_struct(&self, from: ScopeId, path: &str) -> bool {
        let segments: Vec<NameId> = path.split("::").map(NameId::new).collect();
        let mut current = Some(from);
        while let Some(id) = current {
            if self.resolve_path(id, &segments) {
                return true;
            }
            current = self.get(id).parent;
        }
        false
    }

    /// Walk the leading segments through child scopes of `scope`, then check
    /// the last segment against that scope's identifiers.
    fn resolve_path(&self, scope: ScopeId, segments: &[NameId]) -> bool {
        let (last, prefix) = match segments.split_last() {
            Some(split) => split,
            None => return false,
        };
        let mut id = scope;
        for segment in prefix {
            match self.get(id).children.get(segment) {
                Some(&child) => id = child,
                None => return false,
            }
        }
        matches!(
            self.get(id).identifiers.get(last),
            Some(IdentifierKind::Struct)
        )
    }
}
