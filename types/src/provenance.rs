//! Provenance model: how each receiver and value came to exist while a script
//! was interpreted.
//!
//! Nodes live in an append-only arena ([`ProvenanceTree`]) and refer to the
//! node they were derived from by [`NodeId`]. A node may only reference an
//! earlier node, so every chain is acyclic and ends at a root.

use std::fmt;
use std::iter::FusedIterator;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NodeId;

// ── Literals ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    String(String),
    Integer(i64),
    Boolean(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
        }
    }
}

// ── Configure calls ──────────────────────────────────────────

/// A named configuration function invoked on a receiver, such as
/// `application { … }` or `conventions { … }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessAndConfigure {
    receiver: NodeId,
    function_name: String,
}

impl AccessAndConfigure {
    pub fn new(receiver: NodeId, function_name: impl Into<String>) -> Self {
        Self {
            receiver,
            function_name: function_name.into(),
        }
    }

    #[must_use]
    pub const fn receiver(&self) -> NodeId {
        self.receiver
    }

    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

// ── Nodes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TopLevel,
    ImplicitSelf,
    AccessAndConfigure,
    Constant,
    PropertyReference,
    NewObject,
    External,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLevel => "top-level",
            Self::ImplicitSelf => "implicit-self",
            Self::AccessAndConfigure => "access-and-configure",
            Self::Constant => "constant",
            Self::PropertyReference => "property-reference",
            Self::NewObject => "new-object",
            Self::External => "external",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of provenance recorded by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvenanceNode {
    /// The implicit top-level scope of a single script. Has no receiver.
    TopLevel,
    /// Pass-through reference to an enclosing receiver.
    ImplicitSelf { resolved_to: NodeId },
    AccessAndConfigure(AccessAndConfigure),
    Constant { literal: Literal },
    PropertyReference {
        receiver: NodeId,
        property_name: String,
    },
    /// Object produced by a factory function, e.g. `dependency("…")`.
    NewObject {
        receiver: NodeId,
        function_name: String,
    },
    External { key: String },
}

impl ProvenanceNode {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::TopLevel => NodeKind::TopLevel,
            Self::ImplicitSelf { .. } => NodeKind::ImplicitSelf,
            Self::AccessAndConfigure(_) => NodeKind::AccessAndConfigure,
            Self::Constant { .. } => NodeKind::Constant,
            Self::PropertyReference { .. } => NodeKind::PropertyReference,
            Self::NewObject { .. } => NodeKind::NewObject,
            Self::External { .. } => NodeKind::External,
        }
    }

    /// The node this one was derived from, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        match self {
            Self::ImplicitSelf { resolved_to } => Some(*resolved_to),
            Self::AccessAndConfigure(call) => Some(call.receiver),
            Self::PropertyReference { receiver, .. } | Self::NewObject { receiver, .. } => {
                Some(*receiver)
            }
            Self::TopLevel | Self::Constant { .. } | Self::External { .. } => None,
        }
    }
}

impl fmt::Display for ProvenanceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLevel => f.write_str("<top-level>"),
            Self::ImplicitSelf { .. } => f.write_str("<this>"),
            Self::AccessAndConfigure(call) => f.write_str(call.function_name()),
            Self::Constant { literal } => write!(f, "{literal}"),
            Self::PropertyReference { property_name, .. } => write!(f, "property({property_name})"),
            Self::NewObject { function_name, .. } => write!(f, "{function_name}()"),
            Self::External { key } => write!(f, "external({key})"),
        }
    }
}

// ── Errors ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    #[error("node {node} references {referenced}, which is not an earlier node")]
    ForwardReference { node: NodeId, referenced: NodeId },
    #[error("provenance tree cannot hold more than {} nodes", u32::MAX)]
    CapacityExceeded,
}

// ── Tree ─────────────────────────────────────────────────────

/// Append-only arena of provenance nodes.
///
/// Every mutation goes through [`ProvenanceTree::push`], which rejects
/// references to nodes that do not precede the new one. Deserialization
/// validates the same way, so a cyclic tree is unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceTree {
    nodes: Vec<ProvenanceNode>,
}

impl<'de> Deserialize<'de> for ProvenanceTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TreeWire {
            nodes: Vec<ProvenanceNode>,
        }

        let wire = TreeWire::deserialize(deserializer)?;
        Self::from_nodes(wire.nodes).map_err(D::Error::custom)
    }
}

impl ProvenanceTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build a tree from nodes in insertion order, validating every reference.
    pub fn from_nodes(nodes: Vec<ProvenanceNode>) -> Result<Self, ProvenanceError> {
        let mut tree = Self {
            nodes: Vec::with_capacity(nodes.len()),
        };
        for node in nodes {
            tree.push(node)?;
        }
        Ok(tree)
    }

    pub fn push(&mut self, node: ProvenanceNode) -> Result<NodeId, ProvenanceError> {
        let id = u32::try_from(self.nodes.len())
            .map(NodeId::new)
            .map_err(|_| ProvenanceError::CapacityExceeded)?;
        if let Some(referenced) = node.parent()
            && referenced >= id
        {
            return Err(ProvenanceError::ForwardReference { node: id, referenced });
        }
        self.nodes.push(node);
        Ok(id)
    }

    pub fn top_level(&mut self) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::TopLevel)
    }

    pub fn implicit_self(&mut self, resolved_to: NodeId) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::ImplicitSelf { resolved_to })
    }

    pub fn access_and_configure(
        &mut self,
        receiver: NodeId,
        function_name: impl Into<String>,
    ) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::AccessAndConfigure(AccessAndConfigure::new(
            receiver,
            function_name,
        )))
    }

    pub fn constant(&mut self, literal: Literal) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::Constant { literal })
    }

    pub fn property_reference(
        &mut self,
        receiver: NodeId,
        property_name: impl Into<String>,
    ) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::PropertyReference {
            receiver,
            property_name: property_name.into(),
        })
    }

    pub fn new_object(
        &mut self,
        receiver: NodeId,
        function_name: impl Into<String>,
    ) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::NewObject {
            receiver,
            function_name: function_name.into(),
        })
    }

    pub fn external(&mut self, key: impl Into<String>) -> Result<NodeId, ProvenanceError> {
        self.push(ProvenanceNode::External { key: key.into() })
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ProvenanceNode> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(ProvenanceNode::parent)
    }

    /// Walk from `id` toward the root, yielding `id` first.
    #[must_use]
    pub fn chain(&self, id: NodeId) -> Chain<'_> {
        Chain {
            tree: self,
            next: Some(id),
        }
    }

    /// Render the chain ending at `id` root-first, e.g.
    /// `<top-level> > conventions > application`. Implicit-self hops are omitted.
    #[must_use]
    pub fn describe_chain(&self, id: NodeId) -> ChainDisplay<'_> {
        ChainDisplay {
            tree: self,
            origin: id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chain<'a> {
    tree: &'a ProvenanceTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (NodeId, &'a ProvenanceNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let node = self.tree.get(id)?;
        self.next = node.parent();
        Some((id, node))
    }
}

impl FusedIterator for Chain<'_> {}

#[derive(Debug, Clone, Copy)]
pub struct ChainDisplay<'a> {
    tree: &'a ProvenanceTree,
    origin: NodeId,
}

impl fmt::Display for ChainDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tree.contains(self.origin) {
            return write!(f, "<unknown {}>", self.origin);
        }

        let mut hops: Vec<&ProvenanceNode> = self
            .tree
            .chain(self.origin)
            .map(|(_, node)| node)
            .filter(|node| !matches!(node, ProvenanceNode::ImplicitSelf { .. }))
            .collect();
        hops.reverse();

        for (position, node) in hops.into_iter().enumerate() {
            if position > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
