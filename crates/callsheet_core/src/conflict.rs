//! Conflicts detected between analysis stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of disagreement or quality problem a conflict describes.
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
pub enum ConflictType {
    /// An extracted element contradicts the technical read
    ClassificationConflict,
    /// An element the technical read expects was not extracted
    MissingElements,
    /// Extracted elements fall below the confidence threshold
    QualityIssue,
    /// Analysis stages disagree with each other
    Inconsistency,
}

/// Severity of a conflict.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Informational
    Low,
    /// Worth reviewing during prep
    Medium,
    /// Likely to affect the shooting plan
    High,
    /// Blocks the breakdown from being trusted
    Critical,
}

/// A detected disagreement between outputs of different analysis stages.
///
/// Conflicts are created once per pipeline run by the detector and consumed
/// exactly once by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Unique id within the run
    pub conflict_id: String,
    /// Kind of conflict
    pub conflict_type: ConflictType,
    /// Severity
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Names of the stages whose outputs disagree
    pub agents_involved: BTreeSet<String>,
    /// Opaque supporting payload for the resolver
    pub evidence: serde_json::Value,
}
