//! Plain-text summary of processed conventions.

use std::fmt::Write;

use dcl_types::{NodeId, ProcessedConventions, ProvenanceTree};

/// One line per software type, optionally followed by its records.
#[must_use]
pub fn render_summary(
    conventions: &ProcessedConventions,
    tree: &ProvenanceTree,
    list_records: bool,
) -> String {
    if conventions.is_empty() {
        return "no conventions recorded\n".to_owned();
    }

    let mut out = String::new();
    for software_type in conventions.software_types() {
        let assignments = conventions.assignments_for(software_type);
        let additions = conventions.additions_for(software_type);
        let _ = writeln!(
            out,
            "{software_type}: {} assignment(s), {} addition(s)",
            assignments.len(),
            additions.len()
        );
        if !list_records {
            continue;
        }
        for record in assignments {
            let _ = writeln!(
                out,
                "  {} = {}",
                record.property_name(),
                node_label(tree, record.value())
            );
        }
        for record in additions {
            let _ = writeln!(out, "  + {}", node_label(tree, record.added_value()));
        }
    }
    out
}

fn node_label(tree: &ProvenanceTree, id: NodeId) -> String {
    tree.get(id)
        .map_or_else(|| format!("<unknown {id}>"), ToString::to_string)
}
