//! Shared test utilities and fixtures
//!
//! Records provenance the way the script interpreter does, so tests can be
//! written as nested blocks instead of raw node lists.

#![allow(dead_code)]

use dcl_types::{
    AdditionRecord, AssignmentRecord, Literal, NodeId, ProvenanceTree, ResolutionResult,
};

pub struct ScriptRecorder {
    tree: ProvenanceTree,
    top: NodeId,
    assignments: Vec<AssignmentRecord>,
    additions: Vec<AdditionRecord>,
}

impl ScriptRecorder {
    pub fn new() -> Self {
        let mut tree = ProvenanceTree::new();
        let top = tree.top_level().expect("top level");
        Self {
            tree,
            top,
            assignments: Vec::new(),
            additions: Vec::new(),
        }
    }

    pub fn top(&self) -> NodeId {
        self.top
    }

    /// `receiver { name { … } }`
    pub fn block(&mut self, receiver: NodeId, name: &str) -> NodeId {
        let this = self.tree.implicit_self(receiver).expect("implicit self");
        self.tree
            .access_and_configure(this, name)
            .expect("configure call")
    }

    /// `conventions { <software_type> { … } }`, returning the software-type block.
    pub fn software_type(&mut self, name: &str) -> NodeId {
        let conventions = self.block(self.top, "conventions");
        self.block(conventions, name)
    }

    /// `property = value` inside `block`.
    pub fn assign(&mut self, block: NodeId, property: &str, value: Literal) -> AssignmentRecord {
        let receiver = self.tree.implicit_self(block).expect("implicit self");
        let value = self.tree.constant(value).expect("constant");
        let record = AssignmentRecord::new(receiver, property, value);
        self.assignments.push(record.clone());
        record
    }

    /// `factory(…)` added to the collection `block` configures.
    pub fn add(&mut self, block: NodeId, factory: &str) -> AdditionRecord {
        let container = self.tree.implicit_self(block).expect("implicit self");
        let element = self
            .tree
            .new_object(container, factory)
            .expect("new object");
        let record = AdditionRecord::new(container, element);
        self.additions.push(record.clone());
        record
    }

    pub fn finish(self) -> ResolutionResult {
        ResolutionResult::new(self.tree, self.assignments, self.additions)
            .expect("recorded ids always exist")
    }
}

pub fn text(value: &str) -> Literal {
    Literal::String(value.to_owned())
}
