//! Wire types exchanged with the analysis collaborator.

use serde::{Deserialize, Serialize};

/// Analysis task types the collaborator accepts.
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
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskType {
    /// Semantic synopsis of the scene (the emotional read)
    SemanticSynopsis,
    /// Prop candidate extraction (the breakdown read)
    PropClassification,
    /// Wardrobe inference per character
    WardrobeInference,
    /// Cinematic pattern analysis
    CinematicPatterns,
    /// Structural/continuity validation (the technical read)
    ContinuityCheck,
}

/// Status returned by a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubmitStatus {
    /// Job accepted; poll for completion
    Started,
    /// Collaborator answered synchronously from its own fallback path
    Fallback,
    /// Job queued but not yet started
    Pending,
    /// Job already executing
    Processing,
}

/// Receipt for a submitted analysis task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Collaborator-issued job id
    pub job_id: String,
    /// Submission status
    pub status: SubmitStatus,
    /// Result payload; present iff `status` is `Fallback`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl SubmitReceipt {
    /// Whether the receipt already carries a synchronous result.
    pub fn is_synchronous(&self) -> bool {
        self.status == SubmitStatus::Fallback && self.result.is_some()
    }
}

/// Lifecycle state of a polled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobState {
    /// Queued
    Pending,
    /// Executing
    Processing,
    /// Finished; `result` is present
    Completed,
    /// Errored; `error` is present
    Failed,
}

/// Status of an in-flight collaborator job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Collaborator-issued job id
    pub job_id: String,
    /// Lifecycle state
    pub status: JobState,
    /// Progress in [0, 1]
    #[serde(default)]
    pub progress: f64,
    /// Result payload, present when `status` is `Completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message, present when `status` is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
