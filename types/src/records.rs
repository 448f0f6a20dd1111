//! Mutation records produced by interpreting a script, and their grouping by
//! software type.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{NodeId, ProvenanceTree};

// ── Records ──────────────────────────────────────────────────

/// A property write: `property_name = value` on `target_receiver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    target_receiver: NodeId,
    property_name: String,
    value: NodeId,
}

impl AssignmentRecord {
    pub fn new(target_receiver: NodeId, property_name: impl Into<String>, value: NodeId) -> Self {
        Self {
            target_receiver,
            property_name: property_name.into(),
            value,
        }
    }

    #[must_use]
    pub const fn target_receiver(&self) -> NodeId {
        self.target_receiver
    }

    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    #[must_use]
    pub const fn value(&self) -> NodeId {
        self.value
    }
}

/// An element added to a collection-like receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionRecord {
    container: NodeId,
    added_value: NodeId,
}

impl AdditionRecord {
    #[must_use]
    pub const fn new(container: NodeId, added_value: NodeId) -> Self {
        Self {
            container,
            added_value,
        }
    }

    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub const fn added_value(&self) -> NodeId {
        self.added_value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Assignment,
    Addition,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignment => f.write_str("assignment"),
            Self::Addition => f.write_str("addition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {index} references node {node}, which is not in the provenance tree")]
pub struct ResolutionError {
    pub kind: RecordKind,
    pub index: usize,
    pub node: NodeId,
}

// ── Resolution result ────────────────────────────────────────

/// Everything recorded while interpreting one script.
///
/// Records keep script execution order. Every node id a record mentions is
/// checked against the provenance tree at construction and on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    provenance: ProvenanceTree,
    assignments: Vec<AssignmentRecord>,
    additions: Vec<AdditionRecord>,
}

impl<'de> Deserialize<'de> for ResolutionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ResolutionResultWire {
            provenance: ProvenanceTree,
            #[serde(default)]
            assignments: Vec<AssignmentRecord>,
            #[serde(default)]
            additions: Vec<AdditionRecord>,
        }

        let wire = ResolutionResultWire::deserialize(deserializer)?;
        Self::new(wire.provenance, wire.assignments, wire.additions).map_err(D::Error::custom)
    }
}

impl ResolutionResult {
    pub fn new(
        provenance: ProvenanceTree,
        assignments: Vec<AssignmentRecord>,
        additions: Vec<AdditionRecord>,
    ) -> Result<Self, ResolutionError> {
        let dangling = |kind, index, node| ResolutionError { kind, index, node };

        for (index, record) in assignments.iter().enumerate() {
            for node in [record.target_receiver, record.value] {
                if !provenance.contains(node) {
                    return Err(dangling(RecordKind::Assignment, index, node));
                }
            }
        }
        for (index, record) in additions.iter().enumerate() {
            for node in [record.container, record.added_value] {
                if !provenance.contains(node) {
                    return Err(dangling(RecordKind::Addition, index, node));
                }
            }
        }

        Ok(Self {
            provenance,
            assignments,
            additions,
        })
    }

    #[must_use]
    pub const fn provenance(&self) -> &ProvenanceTree {
        &self.provenance
    }

    #[must_use]
    pub fn assignments(&self) -> &[AssignmentRecord] {
        &self.assignments
    }

    #[must_use]
    pub fn additions(&self) -> &[AdditionRecord] {
        &self.additions
    }
}

// ── Processed conventions ────────────────────────────────────

/// Mutation records grouped by the name of the software type that owns them.
///
/// Within each group records keep the order they had in the
/// [`ResolutionResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedConventions {
    assignments_by_type: BTreeMap<String, Vec<AssignmentRecord>>,
    additions_by_type: BTreeMap<String, Vec<AdditionRecord>>,
}

impl ProcessedConventions {
    #[must_use]
    pub const fn new(
        assignments_by_type: BTreeMap<String, Vec<AssignmentRecord>>,
        additions_by_type: BTreeMap<String, Vec<AdditionRecord>>,
    ) -> Self {
        Self {
            assignments_by_type,
            additions_by_type,
        }
    }

    #[must_use]
    pub const fn assignments_by_type(&self) -> &BTreeMap<String, Vec<AssignmentRecord>> {
        &self.assignments_by_type
    }

    #[must_use]
    pub const fn additions_by_type(&self) -> &BTreeMap<String, Vec<AdditionRecord>> {
        &self.additions_by_type
    }

    #[must_use]
    pub fn assignments_for(&self, software_type: &str) -> &[AssignmentRecord] {
        self.assignments_by_type
            .get(software_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn additions_for(&self, software_type: &str) -> &[AdditionRecord] {
        self.additions_by_type
            .get(software_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every software type with at least one record, sorted by name.
    pub fn software_types(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .assignments_by_type
            .keys()
            .chain(self.additions_by_type.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments_by_type.is_empty() && self.additions_by_type.is_empty()
    }

    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Vec<AssignmentRecord>>,
        BTreeMap<String, Vec<AdditionRecord>>,
    ) {
        (self.assignments_by_type, self.additions_by_type)
    }
}
