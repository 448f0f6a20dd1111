//! Conventions resolution for DCL scripts.
//!
//! After a script is interpreted, every assignment and collection addition it
//! performed is recorded with the provenance of its receiver. This crate
//! attributes each record to the software-type block that owns it and groups
//! the records per software type:
//!
//! - **`classify`**: walks a provenance chain to the enclosing
//!   `conventions { <softwareType> { … } }` block
//! - **`processor`**: applies classification to a whole
//!   [`ResolutionResult`](dcl_types::ResolutionResult), all or nothing
//!
//! Everything here is a pure function of its input.

pub mod classify;
mod errors;
pub mod processor;

pub use classify::{
    CONVENTIONS_FUNCTION, SoftwareType, find_software_type, is_conventions_call, is_software_type,
};
pub use errors::{ClassificationError, ProcessError};
pub use processor::ConventionsResolutionProcessor;
