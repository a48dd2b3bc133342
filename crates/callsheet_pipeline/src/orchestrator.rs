//! The pipeline state machine.
//!
//! One orchestrator instance processes one script at a time; independent
//! instances may run concurrently, each owning its own decision history and
//! job-id namespace. Stages run strictly in sequence (supervision needs
//! all three prior outputs) and every stage that talks to the collaborator
//! carries a deterministic local fallback, so the run never fails on input
//! data. Only configuration errors abort without a report.

use crate::collaborator::await_result;
use crate::fallback::{fallback_emotional, fallback_technical};
use crate::PipelineConfig;
use callsheet_core::{
    AnalysisSource, BreakdownAnalysis, EmotionalAnalysis, FinalReport, TechnicalAnalysis,
};
use callsheet_error::CallsheetResult;
use callsheet_interface::{AnalysisCollaborator, TaskType};
use callsheet_supervisor::{
    aggregate_confidence, ConflictDetector, DecisionHistory, ElementLogicCheck, Supervisor,
};
use callsheet_taxonomy::{aggregate_sheets, ClassificationEngine, TaxonomyRegistry};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// States of the per-script pipeline, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineState {
    /// The emotional read
    Emotional,
    /// The technical read
    Technical,
    /// The production-breakdown read
    Breakdown,
    /// Conflict detection, resolution, and confidence aggregation
    Supervision,
    /// Terminal; the report exists
    Done,
}

impl PipelineState {
    /// The state entered after this one; `None` from the terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineState::Emotional => Some(PipelineState::Technical),
            PipelineState::Technical => Some(PipelineState::Breakdown),
            PipelineState::Breakdown => Some(PipelineState::Supervision),
            PipelineState::Supervision => Some(PipelineState::Done),
            PipelineState::Done => None,
        }
    }
}

/// Sequences the analysis stages over one script and assembles the report.
pub struct PipelineOrchestrator<C: AnalysisCollaborator> {
    collaborator: C,
    engine: ClassificationEngine,
    detector: ConflictDetector,
    supervisor: Supervisor,
    config: PipelineConfig,
}

impl<C: AnalysisCollaborator> PipelineOrchestrator<C> {
    /// Create an orchestrator with the bundled taxonomy and supervisor rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled registry fails validation: a
    /// configuration error, fatal before any run starts.
    pub fn new(collaborator: C, config: PipelineConfig) -> CallsheetResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: ClassificationEngine::new(TaxonomyRegistry::bundled()?),
            detector: ConflictDetector::new(config.confidence_threshold),
            supervisor: Supervisor::bundled()?,
            collaborator,
            config,
        })
    }

    /// Replace the taxonomy registry.
    pub fn with_registry(mut self, registry: TaxonomyRegistry) -> Self {
        self.engine = ClassificationEngine::new(registry);
        self
    }

    /// Replace the supervisor rule set.
    pub fn with_supervisor(mut self, supervisor: Supervisor) -> Self {
        self.supervisor = supervisor;
        self
    }

    /// Replace the element plausibility check used by conflict detection.
    pub fn with_logic_check(mut self, check: Box<dyn ElementLogicCheck>) -> Self {
        self.detector =
            ConflictDetector::new(self.config.confidence_threshold).with_logic_check(check);
        self
    }

    /// Process one script through all stages and produce its report.
    ///
    /// Stage order is fixed: emotional, technical, breakdown, supervision.
    /// Collaborator failures and timeouts divert the affected stage to its
    /// local fallback and the run continues; callers always receive a
    /// report and inspect `human_review_required` / `critical_issues` for
    /// quality problems.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration-class failures inside
    /// supervision; input-data problems never surface as errors.
    #[instrument(skip(self, source_text), fields(script_id = %script_id, text_len = source_text.len()))]
    pub async fn run(&self, script_id: &str, source_text: &str) -> CallsheetResult<FinalReport> {
        info!(state = %PipelineState::Emotional, "Entering stage");
        let emotional = self.emotional_stage(source_text).await;

        info!(state = %PipelineState::Technical, "Entering stage");
        let technical = self.technical_stage(source_text).await;

        info!(state = %PipelineState::Breakdown, "Entering stage");
        let breakdown = self.breakdown_stage(source_text, script_id).await;

        info!(state = %PipelineState::Supervision, "Entering stage");
        let report = self.supervise(script_id, emotional, technical, breakdown)?;

        info!(
            state = %PipelineState::Done,
            overall_confidence = report.overall_confidence,
            human_review_required = report.human_review_required,
            "Pipeline finished"
        );
        Ok(report)
    }

    /// The emotional read: collaborator first, tone keywords on failure.
    async fn emotional_stage(&self, text: &str) -> EmotionalAnalysis {
        match self.collaborator_value(text, TaskType::SemanticSynopsis).await {
            Ok(value) => match serde_json::from_value::<EmotionalAnalysis>(value) {
                Ok(mut parsed) if (0.0..=1.0).contains(&parsed.audience_engagement) => {
                    parsed.source = AnalysisSource::Collaborator;
                    parsed
                }
                Ok(parsed) => {
                    warn!(
                        engagement = parsed.audience_engagement,
                        "Emotional result out of range, using fallback"
                    );
                    fallback_emotional(text)
                }
                Err(e) => {
                    warn!(error = %e, "Emotional result failed validation, using fallback");
                    fallback_emotional(text)
                }
            },
            Err(e) => {
                warn!(error = %e, "Emotional read unavailable, using fallback");
                fallback_emotional(text)
            }
        }
    }

    /// The technical read: collaborator first, header regexes on failure.
    async fn technical_stage(&self, text: &str) -> TechnicalAnalysis {
        match self.collaborator_value(text, TaskType::ContinuityCheck).await {
            Ok(value) => match serde_json::from_value::<TechnicalAnalysis>(value) {
                Ok(mut parsed) => {
                    parsed.source = AnalysisSource::Collaborator;
                    parsed
                }
                Err(e) => {
                    warn!(error = %e, "Technical result failed validation, using fallback");
                    fallback_technical(text)
                }
            },
            Err(e) => {
                warn!(error = %e, "Technical read unavailable, using fallback");
                fallback_technical(text)
            }
        }
    }

    /// The breakdown read.
    ///
    /// Element extraction is always the local deterministic engine; that
    /// is the evidence-backed core. The collaborator's prop read is
    /// consulted for cross-checking and logged; losing it only marks the
    /// stage result as fallback-sourced.
    async fn breakdown_stage(&self, text: &str, scene_id: &str) -> BreakdownAnalysis {
        let source = match self.collaborator_value(text, TaskType::PropClassification).await {
            Ok(hints) => {
                debug!(hints = %hints, "Collaborator prop read received");
                AnalysisSource::Collaborator
            }
            Err(e) => {
                warn!(error = %e, "Prop read unavailable, breakdown is extraction-only");
                AnalysisSource::Fallback
            }
        };

        let elements = self.engine.classify_multiple_concurrent(text, scene_id).await;
        BreakdownAnalysis::from_elements(elements, source)
    }

    /// Detect conflicts, resolve each one, aggregate confidence, and
    /// assemble the report. Cannot fall back: errors here are
    /// configuration-class and abort the run.
    fn supervise(
        &self,
        script_id: &str,
        emotional: EmotionalAnalysis,
        technical: TechnicalAnalysis,
        breakdown: BreakdownAnalysis,
    ) -> CallsheetResult<FinalReport> {
        let conflicts = self.detector.detect(&emotional, &technical, &breakdown);

        let mut history = DecisionHistory::new();
        for conflict in &conflicts {
            self.supervisor.resolve(conflict, &mut history);
        }
        let decisions = history.decisions().to_vec();

        let verdict = aggregate_confidence(
            &emotional,
            &technical,
            &breakdown.elements,
            &decisions,
            self.config.human_review_threshold,
        );
        let breakdown_sheets = aggregate_sheets(&breakdown.elements);

        Ok(FinalReport {
            script_id: script_id.to_string(),
            emotional,
            technical,
            elements: breakdown.elements,
            breakdown_sheets,
            conflicts_detected: conflicts,
            decisions_made: decisions,
            overall_confidence: verdict.overall_confidence,
            human_review_required: verdict.human_review_required,
            critical_issues: verdict.critical_issues,
            generated_at: Utc::now(),
        })
    }

    /// Submit a task and wait for its result, within the stage deadline.
    async fn collaborator_value(
        &self,
        text: &str,
        task: TaskType,
    ) -> CallsheetResult<serde_json::Value> {
        let context = serde_json::json!({});
        let receipt = self.collaborator.submit(text, task, &context).await?;
        await_result(&self.collaborator, &receipt, &self.config, task).await
    }
}
