//! Software-type classification.
//!
//! A software type is the configure call nested directly inside a top-level
//! `conventions { … }` call. Every mutation below it, at any depth, belongs to
//! that software type:
//!
//! ```text
//! conventions {            <- conventions call on the top-level scope
//!     application {        <- software type
//!         dependencies {   <- classified as `application`
//!         }
//!     }
//! }
//! ```

use dcl_types::{AccessAndConfigure, NodeId, ProvenanceNode, ProvenanceTree};

use crate::ClassificationError;

/// Name of the top-level call that wraps software-type blocks.
pub const CONVENTIONS_FUNCTION: &str = "conventions";

/// A configure call identified as a software-type block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareType<'a> {
    id: NodeId,
    call: &'a AccessAndConfigure,
}

impl<'a> SoftwareType<'a> {
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn call(self) -> &'a AccessAndConfigure {
        self.call
    }

    #[must_use]
    pub fn name(self) -> &'a str {
        self.call.function_name()
    }
}

/// Find the software type that owns `origin`.
///
/// Walks receivers toward the script root and stops at the first configure
/// call for which [`is_software_type`] holds. Implicit-self hops are skipped.
/// Reaching the top-level scope, or any node that is neither a configure call
/// nor an implicit self, is a failure.
pub fn find_software_type(
    tree: &ProvenanceTree,
    origin: NodeId,
) -> Result<SoftwareType<'_>, ClassificationError> {
    let mut current = origin;
    loop {
        let Some(node) = tree.get(current) else {
            return Err(ClassificationError::UnknownNode {
                origin,
                node: current,
            });
        };

        match node {
            ProvenanceNode::ImplicitSelf { resolved_to } => current = *resolved_to,
            ProvenanceNode::AccessAndConfigure(call) => {
                if is_software_type(tree, call) {
                    tracing::trace!(
                        origin = %origin,
                        software_type = call.function_name(),
                        "Classified provenance node"
                    );
                    return Ok(SoftwareType { id: current, call });
                }
                current = call.receiver();
            }
            ProvenanceNode::TopLevel => {
                return Err(ClassificationError::ReachedTopLevel {
                    origin,
                    chain: tree.describe_chain(origin).to_string(),
                });
            }
            ProvenanceNode::Constant { .. }
            | ProvenanceNode::PropertyReference { .. }
            | ProvenanceNode::NewObject { .. }
            | ProvenanceNode::External { .. } => {
                return Err(ClassificationError::Unclassifiable {
                    origin,
                    node: current,
                    kind: node.kind(),
                    chain: tree.describe_chain(origin).to_string(),
                });
            }
        }
    }
}

/// Whether `call` sits directly inside a top-level `conventions { … }` call.
///
/// One implicit-self layer between `call` and its receiver is unwrapped.
#[must_use]
pub fn is_software_type(tree: &ProvenanceTree, call: &AccessAndConfigure) -> bool {
    match tree.get(unwrap_implicit_self(tree, call.receiver())) {
        Some(ProvenanceNode::AccessAndConfigure(parent)) => is_conventions_call(tree, parent),
        _ => false,
    }
}

/// Whether `call` is `conventions { … }` invoked on the top-level scope.
#[must_use]
pub fn is_conventions_call(tree: &ProvenanceTree, call: &AccessAndConfigure) -> bool {
    call.function_name() == CONVENTIONS_FUNCTION
        && matches!(
            tree.get(unwrap_implicit_self(tree, call.receiver())),
            Some(ProvenanceNode::TopLevel)
        )
}

fn unwrap_implicit_self(tree: &ProvenanceTree, id: NodeId) -> NodeId {
    match tree.get(id) {
        Some(ProvenanceNode::ImplicitSelf { resolved_to }) => *resolved_to,
        _ => id,
    }
}
