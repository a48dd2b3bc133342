//! The analysis collaborator boundary.

use crate::{JobStatus, SubmitReceipt, TaskType};
use async_trait::async_trait;
use callsheet_error::CallsheetResult;

/// The external narrative/technical analysis service consumed by the core.
///
/// Implementations are expected to be cheap to clone or share; the pipeline
/// holds one instance per orchestrator. The core never depends on *how* the
/// collaborator produces results: every call site treats failure as a cue
/// to fall back to a local deterministic heuristic.
#[async_trait]
pub trait AnalysisCollaborator: Send + Sync {
    /// Submit a script fragment for analysis.
    ///
    /// When the returned receipt carries `SubmitStatus::Fallback`, the
    /// result is already populated and no polling is needed.
    async fn submit(
        &self,
        text: &str,
        task: TaskType,
        context: &serde_json::Value,
    ) -> CallsheetResult<SubmitReceipt>;

    /// Fetch the status of a previously submitted job.
    async fn status(&self, job_id: &str) -> CallsheetResult<JobStatus>;

    /// Collaborator name for logging (e.g., "brain_service", "mock").
    fn collaborator_name(&self) -> &'static str;
}
