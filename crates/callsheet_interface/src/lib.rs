//! Trait definitions for the Callsheet breakdown pipeline.
//!
//! This crate defines the boundary to the external narrative/technical
//! analysis collaborator: the `AnalysisCollaborator` trait and the wire
//! types it exchanges. The collaborator itself (prompt templates, model
//! selection, response formatting) is out of scope; the core only consumes
//! its submit/poll surface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::AnalysisCollaborator;
pub use types::{JobState, JobStatus, SubmitReceipt, SubmitStatus, TaskType};
