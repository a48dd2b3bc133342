//! The terminal report artifact of a pipeline run.

use crate::{
    BreakdownSheet, Conflict, EmotionalAnalysis, ProductionElement, SupervisorDecision,
    TechnicalAnalysis,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated output of one pipeline run over one script.
///
/// Created exactly once per script by the orchestrator. Callers inspect
/// `human_review_required` and `critical_issues` rather than catching
/// errors to discover quality problems: any input-data problem upstream
/// has already been absorbed by a stage fallback by the time this exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    /// Identifier of the analyzed script
    pub script_id: String,
    /// The emotional read
    pub emotional: EmotionalAnalysis,
    /// The technical read
    pub technical: TechnicalAnalysis,
    /// All extracted elements, in extraction order
    pub elements: Vec<ProductionElement>,
    /// Per-category sheets derived from `elements`
    pub breakdown_sheets: Vec<BreakdownSheet>,
    /// Conflicts raised between the analysis stages
    pub conflicts_detected: Vec<Conflict>,
    /// One decision per conflict, in detection order
    pub decisions_made: Vec<SupervisorDecision>,
    /// Weighted overall confidence in [0, 1]
    pub overall_confidence: f64,
    /// Whether the run must be reviewed by a person
    pub human_review_required: bool,
    /// Human-readable critical issues accumulated during arbitration
    pub critical_issues: Vec<String>,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}
