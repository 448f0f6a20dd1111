//! Grouping of recorded mutations by the software type that owns them.

use std::collections::BTreeMap;

use dcl_types::{
    AdditionRecord, AssignmentRecord, ProcessedConventions, ProvenanceTree, ResolutionResult,
};

use crate::{ProcessError, find_software_type};

/// Turns a [`ResolutionResult`] into [`ProcessedConventions`].
///
/// Stateless; one instance can serve any number of scripts, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionsResolutionProcessor;

impl ConventionsResolutionProcessor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Group every assignment and addition by its software type.
    ///
    /// All or nothing: the first record that cannot be classified fails the
    /// whole call and nothing is returned.
    pub fn process(&self, result: &ResolutionResult) -> Result<ProcessedConventions, ProcessError> {
        let tree = result.provenance();

        let assignments = group_assignments(tree, result.assignments())?;
        let additions = group_additions(tree, result.additions())?;

        tracing::debug!(
            assignments = result.assignments().len(),
            additions = result.additions().len(),
            assignment_groups = assignments.len(),
            addition_groups = additions.len(),
            "Grouped conventions by software type"
        );

        Ok(ProcessedConventions::new(assignments, additions))
    }
}

fn group_assignments(
    tree: &ProvenanceTree,
    records: &[AssignmentRecord],
) -> Result<BTreeMap<String, Vec<AssignmentRecord>>, ProcessError> {
    group_by_software_type(records, |index, record| {
        find_software_type(tree, record.target_receiver())
            .map(|software_type| software_type.name())
            .map_err(|source| ProcessError::Assignment {
                index,
                property_name: record.property_name().to_owned(),
                source,
            })
    })
}

fn group_additions(
    tree: &ProvenanceTree,
    records: &[AdditionRecord],
) -> Result<BTreeMap<String, Vec<AdditionRecord>>, ProcessError> {
    group_by_software_type(records, |index, record| {
        find_software_type(tree, record.container())
            .map(|software_type| software_type.name())
            .map_err(|source| ProcessError::Addition { index, source })
    })
}

/// Stable partition of `records` by the key `classify` returns.
fn group_by_software_type<'t, R: Clone>(
    records: &[R],
    mut classify: impl FnMut(usize, &R) -> Result<&'t str, ProcessError>,
) -> Result<BTreeMap<String, Vec<R>>, ProcessError> {
    let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let software_type = classify(index, record)?;
        groups
            .entry(software_type.to_owned())
            .or_default()
            .push(record.clone());
    }
    Ok(groups)
}
