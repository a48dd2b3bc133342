//! Callsheet: deterministic post-processing core for LLM screenplay
//! breakdowns.
//!
//! An LLM pipeline reads a screenplay three times (emotional, technical,
//! production-breakdown); Callsheet is the part with real invariants: a
//! rule-based taxonomy classifier producing evidence-backed production
//! elements, a conflict detector and rule-driven supervisor arbitrating the
//! disagreeing reads, and the orchestrating state machine with per-stage
//! fallback so a run never fails on input data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use callsheet::{HttpCollaborator, PipelineConfig, PipelineOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     callsheet::init_telemetry()?;
//!
//!     let config = PipelineConfig::load()?;
//!     let collaborator = HttpCollaborator::new(&config)?;
//!     let orchestrator = PipelineOrchestrator::new(collaborator, config)?;
//!
//!     let report = orchestrator.run("script-1", "مشهد 1 - داخلي - نهار - مقهى\n...").await?;
//!     println!("confidence: {}", report.overall_confidence);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The workspace is organized as focused crates:
//!
//! - `callsheet_error` - error types
//! - `callsheet_core` - core data types (elements, sheets, conflicts, ...)
//! - `callsheet_interface` - the analysis collaborator boundary
//! - `callsheet_taxonomy` - rule registry and classification engine
//! - `callsheet_supervisor` - conflict detection and arbitration
//! - `callsheet_pipeline` - orchestration and the HTTP collaborator client
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]

pub use callsheet_core::{
    init_telemetry, AnalysisSource, BreakdownAnalysis, BreakdownSheet, Category, CategoryFamily,
    CharacterConsistency, Conflict, ConflictType, ElementContext, EmotionalAnalysis, Evidence,
    ExpectedElement, FinalReport, PriorityLevel, ProductionElement, Provenance, Resolution,
    SceneHeader, Severity, SupervisorDecision, TechnicalAnalysis,
};
pub use callsheet_error::{
    CallsheetError, CallsheetErrorKind, CallsheetResult, ConfigError, HttpError, JsonError,
    PipelineError, PipelineErrorKind, SupervisorError, SupervisorErrorKind, TaxonomyError,
    TaxonomyErrorKind,
};
pub use callsheet_interface::{
    AnalysisCollaborator, JobState, JobStatus, SubmitReceipt, SubmitStatus, TaskType,
};
pub use callsheet_pipeline::{
    await_result, extract_json, fallback_emotional, fallback_technical, parse_tolerant,
    HttpCollaborator, PipelineConfig, PipelineOrchestrator, PipelineState,
};
pub use callsheet_supervisor::{
    aggregate_confidence, ConfidenceReport, ConflictDetector, DecisionHistory, DefaultLogicCheck,
    ElementLogicCheck, Supervisor, SupervisorRule, DEFAULT_HUMAN_REVIEW_THRESHOLD,
};
pub use callsheet_taxonomy::{
    aggregate_sheets, category_color, category_department, category_priority, match_rule,
    ClassificationEngine, ClassificationRule, RuleMatch, TaxonomyRegistry,
};
