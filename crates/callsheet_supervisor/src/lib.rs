//! Conflict detection and arbitration.
//!
//! This crate reconciles the three analysis reads into a single arbitrated
//! view:
//!
//! - [`ConflictDetector`] compares stage outputs and raises typed conflicts
//!   through four independent, side-effect-free checks.
//! - [`Supervisor`] matches each conflict against an ordered rule set and
//!   emits one [`callsheet_core::SupervisorDecision`] per conflict, recorded
//!   in a per-run [`DecisionHistory`].
//! - [`aggregate_confidence`] combines stage and decision confidences into
//!   the overall score and the human-review flag.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod confidence;
mod detector;
mod resolver;

pub use confidence::{aggregate_confidence, ConfidenceReport, DEFAULT_HUMAN_REVIEW_THRESHOLD};
pub use detector::{ConflictDetector, DefaultLogicCheck, ElementLogicCheck};
pub use resolver::{DecisionHistory, Supervisor, SupervisorRule};
