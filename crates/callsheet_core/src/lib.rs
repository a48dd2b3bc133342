//! Core data types for the Callsheet breakdown pipeline.
//!
//! This crate provides the foundation data types used across the workspace:
//! the fixed 21-category taxonomy, evidence records, production elements,
//! breakdown sheets, conflicts, supervisor decisions, typed stage results,
//! and the final report.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod conflict;
mod decision;
mod element;
mod evidence;
mod report;
mod sheet;
mod stages;
mod telemetry;

pub use category::{Category, CategoryFamily};
pub use conflict::{Conflict, ConflictType, Severity};
pub use decision::{Resolution, SupervisorDecision};
pub use element::{ElementContext, ProductionElement, Provenance};
pub use evidence::Evidence;
pub use report::FinalReport;
pub use sheet::{BreakdownSheet, PriorityLevel};
pub use stages::{
    AnalysisSource, BreakdownAnalysis, CharacterConsistency, EmotionalAnalysis, ExpectedElement,
    SceneHeader, TechnicalAnalysis,
};
pub use telemetry::init_telemetry;
