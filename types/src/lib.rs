//! Core domain types for DCL conventions.
//!
//! This crate contains the provenance model recorded while a script is
//! interpreted, the mutation records that point into it, and the grouped
//! result of conventions resolution. Pure data: no IO, no async.

mod ids;
pub mod provenance;
mod records;

pub use ids::NodeId;
pub use provenance::{
    AccessAndConfigure, Chain, ChainDisplay, Literal, NodeKind, ProvenanceError, ProvenanceNode,
    ProvenanceTree,
};
pub use records::{
    AdditionRecord, AssignmentRecord, ProcessedConventions, RecordKind, ResolutionError,
    ResolutionResult,
};
