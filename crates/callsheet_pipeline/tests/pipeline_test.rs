use callsheet_error::{CallsheetResult, HttpError};
use callsheet_interface::{
    AnalysisCollaborator, JobState, JobStatus, SubmitReceipt, SubmitStatus, TaskType,
};
use callsheet_pipeline::{PipelineConfig, PipelineOrchestrator};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

const SCRIPT: &str = "مشهد 1 - داخلي - نهار - مقهى\nأحمد يحمل كوب قهوة. ليلى ترتدي فستان أحمر.";

/// How the mock behaves for every task.
enum Mode {
    /// Answer synchronously with a fallback-status receipt
    Synchronous,
    /// Answer via one pending poll, then completed
    Polling,
    /// Fail every submit
    Failing,
}

struct MockCollaborator {
    mode: Mode,
    emotional: serde_json::Value,
    technical: serde_json::Value,
    polls: AtomicUsize,
}

impl MockCollaborator {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            emotional: json!({"tone": "مبهج", "audience_engagement": 0.9}),
            technical: json!({"is_valid": true}),
            polls: AtomicUsize::new(0),
        }
    }

    fn with_technical(mut self, technical: serde_json::Value) -> Self {
        self.technical = technical;
        self
    }

    fn result_for(&self, task: &str) -> serde_json::Value {
        match task {
            "semantic_synopsis" => self.emotional.clone(),
            "continuity_check" => self.technical.clone(),
            _ => json!({"props": []}),
        }
    }
}

#[async_trait::async_trait]
impl AnalysisCollaborator for MockCollaborator {
    async fn submit(
        &self,
        _text: &str,
        task: TaskType,
        _context: &serde_json::Value,
    ) -> CallsheetResult<SubmitReceipt> {
        match self.mode {
            Mode::Synchronous => Ok(SubmitReceipt {
                job_id: format!("job-{task}"),
                status: SubmitStatus::Fallback,
                result: Some(self.result_for(&task.to_string())),
            }),
            Mode::Polling => Ok(SubmitReceipt {
                job_id: format!("job-{task}"),
                status: SubmitStatus::Started,
                result: None,
            }),
            Mode::Failing => Err(HttpError::new("connection refused").into()),
        }
    }

    async fn status(&self, job_id: &str) -> CallsheetResult<JobStatus> {
        let task = job_id.trim_start_matches("job-").to_string();
        let polls = self.polls.fetch_add(1, Ordering::SeqCst);
        if polls == 0 {
            // First poll across the run comes back not-ready.
            return Ok(JobStatus {
                job_id: job_id.to_string(),
                status: JobState::Processing,
                progress: 0.5,
                result: None,
                error: None,
            });
        }
        Ok(JobStatus {
            job_id: job_id.to_string(),
            status: JobState::Completed,
            progress: 1.0,
            result: Some(self.result_for(&task)),
            error: None,
        })
    }

    fn collaborator_name(&self) -> &'static str {
        "mock"
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        poll_initial_backoff_ms: 10,
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn failing_collaborator_still_produces_a_report() {
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Failing), test_config()).unwrap();
    let report = orchestrator.run("script-1", SCRIPT).await.unwrap();

    // Extraction is local and keeps working without the collaborator.
    assert!(!report.elements.is_empty());
    assert!(!report.breakdown_sheets.is_empty());
    assert_eq!(report.decisions_made.len(), report.conflicts_detected.len());
    assert!((0.0..=1.0).contains(&report.overall_confidence));
}

#[tokio::test]
async fn empty_script_yields_an_empty_but_valid_report() {
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Failing), test_config()).unwrap();
    let report = orchestrator.run("script-1", "").await.unwrap();

    assert!(report.elements.is_empty());
    assert!(report.breakdown_sheets.is_empty());
    assert_eq!(report.decisions_made.len(), report.conflicts_detected.len());
}

#[tokio::test]
async fn collaborator_results_feed_the_confidence_formula() {
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Synchronous), test_config())
            .unwrap();
    let report = orchestrator.run("script-1", SCRIPT).await.unwrap();

    assert_eq!(report.emotional.tone, "مبهج");
    assert_eq!(report.emotional.audience_engagement, 0.9);
    assert!(report.technical.is_valid);
    // Engaged audience, valid technical read, confident extraction, no
    // conflicts: nothing to review.
    assert!(report.conflicts_detected.is_empty());
    assert!(!report.human_review_required);
}

#[tokio::test]
async fn invalid_technical_with_high_engagement_is_flagged_for_review() {
    let mock = MockCollaborator::new(Mode::Synchronous).with_technical(json!({"is_valid": false}));
    let orchestrator = PipelineOrchestrator::new(mock, test_config()).unwrap();
    let report = orchestrator.run("script-1", SCRIPT).await.unwrap();

    let cross = report
        .conflicts_detected
        .iter()
        .find(|c| {
            c.agents_involved.contains("technical") && c.agents_involved.contains("emotional")
        })
        .expect("expected a cross-stage conflict");
    assert!(report
        .decisions_made
        .iter()
        .any(|d| d.conflict_id == cross.conflict_id));
    assert!(report.human_review_required);
}

#[tokio::test]
async fn polling_jobs_complete_with_backoff() {
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Polling), test_config()).unwrap();
    let report = orchestrator.run("script-1", SCRIPT).await.unwrap();

    // Collaborator values arrived through the poll path.
    assert_eq!(report.emotional.tone, "مبهج");
    assert!(report.technical.is_valid);
}

#[tokio::test]
async fn missing_speakers_trigger_the_review_path() {
    // Without the collaborator, the technical fallback expects the
    // dialogue speakers; the extraction finds only props, so the run
    // accumulates missing-element conflicts and review is required.
    let script = "مشهد 1 - داخلي - نهار - مقهى\nأحمد: خذ الكوب.\nليلى: شكرا.\nأحمد يحمل كوب قهوة.";
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Failing), test_config()).unwrap();
    let report = orchestrator.run("script-1", script).await.unwrap();

    assert!(report
        .conflicts_detected
        .iter()
        .any(|c| c.conflict_type == callsheet_core::ConflictType::MissingElements));
    assert!(!report.critical_issues.is_empty());
    assert!(report.human_review_required);
}

#[tokio::test]
async fn element_invariants_hold_end_to_end() {
    let orchestrator =
        PipelineOrchestrator::new(MockCollaborator::new(Mode::Synchronous), test_config())
            .unwrap();
    let report = orchestrator.run("script-1", SCRIPT).await.unwrap();

    for element in &report.elements {
        assert!(element.evidence.span_start < element.evidence.span_end);
        assert!(element.evidence.span_end <= SCRIPT.len());
        assert_eq!(element.confidence, element.evidence.confidence);
        assert!((0.0..=1.0).contains(&element.confidence));
    }
    let sheet_total: usize = report.breakdown_sheets.iter().map(|s| s.total_count).sum();
    assert_eq!(sheet_total, report.elements.len());
}
