//! Failures raised while attributing mutation records to software types.

use dcl_types::{NodeId, NodeKind};
use thiserror::Error;

/// The provenance chain of a node does not match
/// `conventions { <softwareType> { … } }`.
///
/// `chain` is the rendered path from the script root to the node the walk
/// started at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("could not discover software type for node {origin}: reached the top-level scope via {chain}")]
    ReachedTopLevel { origin: NodeId, chain: String },
    #[error(
        "could not discover software type for node {origin}: {kind} node {node} cannot be classified ({chain})"
    )]
    Unclassifiable {
        origin: NodeId,
        node: NodeId,
        kind: NodeKind,
        chain: String,
    },
    #[error(
        "could not discover software type for node {origin}: node {node} is not in the provenance tree"
    )]
    UnknownNode { origin: NodeId, node: NodeId },
}

impl ClassificationError {
    /// The node the failed walk started from.
    #[must_use]
    pub const fn origin(&self) -> NodeId {
        match self {
            Self::ReachedTopLevel { origin, .. }
            | Self::Unclassifiable { origin, .. }
            | Self::UnknownNode { origin, .. } => *origin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("assignment {index} to '{property_name}' is not inside a software type block")]
    Assignment {
        index: usize,
        property_name: String,
        #[source]
        source: ClassificationError,
    },
    #[error("addition {index} is not inside a software type block")]
    Addition {
        index: usize,
        #[source]
        source: ClassificationError,
    },
}

impl ProcessError {
    #[must_use]
    pub const fn classification(&self) -> &ClassificationError {
        match self {
            Self::Assignment { source, .. } | Self::Addition { source, .. } => source,
        }
    }
}
