//! Supervisor decisions resolving detected conflicts.

use crate::ConflictType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a conflict was resolved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Resolution {
    /// Keep what the script text itself supports
    PreferOriginalText,
    /// Merge the disagreeing stage outputs
    MergeResults,
    /// Queue for a human reviewer
    RequestHumanReview,
    /// Escalate beyond the normal review queue
    Escalate,
}

/// A recorded resolution for one conflict.
///
/// Decisions live in a per-pipeline-run history keyed by `conflict_id`;
/// resolution is a pure function of (conflict, rule set), so re-resolving
/// overwrites an entry with the identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorDecision {
    /// Id of the conflict this decision resolves (1:1)
    pub conflict_id: String,
    /// Stages involved in the conflict
    pub agents_involved: BTreeSet<String>,
    /// Kind of the resolved conflict
    pub conflict_type: ConflictType,
    /// The resolution applied
    pub resolution: Resolution,
    /// Opaque decision payload for the reporting layer
    pub final_decision: serde_json::Value,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Ordered reasoning trail
    pub reasoning: Vec<String>,
}
