//! Combining stage and decision confidences into one overall score.

use callsheet_core::{
    ConflictType, EmotionalAnalysis, ProductionElement, Resolution, SupervisorDecision,
    TechnicalAnalysis,
};
use tracing::debug;

/// Default threshold under which a run requires human review.
pub const DEFAULT_HUMAN_REVIEW_THRESHOLD: f64 = 0.7;

/// Weight of the emotional read's audience engagement.
const W_EMOTIONAL: f64 = 0.20;
/// Weight of the technical validity signal.
const W_TECHNICAL: f64 = 0.30;
/// Weight of the mean element confidence.
const W_ELEMENTS: f64 = 0.30;
/// Weight of the mean decision confidence.
const W_DECISIONS: f64 = 0.20;
/// Technical contribution when the script failed validation.
const INVALID_TECHNICAL_SCORE: f64 = 0.3;
/// Decision-mean stand-in when the run produced no decisions.
const NO_DECISION_SCORE: f64 = 0.8;
/// Decisions below this confidence count as critical issues.
const LOW_DECISION_CONFIDENCE: f64 = 0.6;

/// The aggregated confidence verdict for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceReport {
    /// Weighted overall confidence in [0, 1]
    pub overall_confidence: f64,
    /// Whether a person must review the run
    pub human_review_required: bool,
    /// Human-readable critical issues accumulated during arbitration
    pub critical_issues: Vec<String>,
}

/// Combine per-stage and per-decision confidences into one overall score.
///
/// ```text
/// overall = 0.20 * emotional.audience_engagement
///         + 0.30 * (1.0 if technical.is_valid else 0.3)
///         + 0.30 * mean(element confidences)      // 0.0 with no elements
///         + 0.20 * mean(decision confidences)     // 0.8 with no decisions
/// ```
///
/// Human review is required when the overall score falls below the
/// threshold, when any decision requested review or escalated, or when any
/// critical issue accumulated (low-confidence decisions, missing-elements
/// decisions).
pub fn aggregate_confidence(
    emotional: &EmotionalAnalysis,
    technical: &TechnicalAnalysis,
    elements: &[ProductionElement],
    decisions: &[SupervisorDecision],
    human_review_threshold: f64,
) -> ConfidenceReport {
    let technical_score = if technical.is_valid {
        1.0
    } else {
        INVALID_TECHNICAL_SCORE
    };
    let element_mean = if elements.is_empty() {
        0.0
    } else {
        elements.iter().map(|e| e.confidence).sum::<f64>() / elements.len() as f64
    };
    let decision_mean = if decisions.is_empty() {
        NO_DECISION_SCORE
    } else {
        decisions.iter().map(|d| d.confidence).sum::<f64>() / decisions.len() as f64
    };

    let overall_confidence = W_EMOTIONAL * emotional.audience_engagement
        + W_TECHNICAL * technical_score
        + W_ELEMENTS * element_mean
        + W_DECISIONS * decision_mean;

    let mut critical_issues = Vec::new();
    for decision in decisions {
        if decision.confidence < LOW_DECISION_CONFIDENCE {
            critical_issues.push(format!(
                "decision for {} carries low confidence {:.2}",
                decision.conflict_id, decision.confidence
            ));
        }
        if decision.conflict_type == ConflictType::MissingElements {
            critical_issues.push(format!(
                "missing-elements decision for {} needs production review",
                decision.conflict_id
            ));
        }
    }

    let review_requested = decisions.iter().any(|d| {
        matches!(
            d.resolution,
            Resolution::RequestHumanReview | Resolution::Escalate
        )
    });
    let human_review_required = overall_confidence < human_review_threshold
        || review_requested
        || !critical_issues.is_empty();

    debug!(
        overall_confidence,
        human_review_required,
        critical_issue_count = critical_issues.len(),
        "Aggregated run confidence"
    );

    ConfidenceReport {
        overall_confidence,
        human_review_required,
        critical_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsheet_core::{Category, ElementContext, Evidence, Provenance};
    use serde_json::json;

    fn emotional(engagement: f64) -> EmotionalAnalysis {
        EmotionalAnalysis {
            audience_engagement: engagement,
            ..EmotionalAnalysis::fallback_default()
        }
    }

    fn element(confidence: f64) -> ProductionElement {
        ProductionElement {
            id: "scene-1-props-001".to_string(),
            category: Category::Props,
            name: "كوب".to_string(),
            description: "دعائم: كوب".to_string(),
            scene_id: "scene-1".to_string(),
            evidence: Evidence {
                span_start: 0,
                span_end: 6,
                text_excerpt: "كوب".to_string(),
                rationale: "test".to_string(),
                confidence,
            },
            confidence,
            extracted_by: Provenance::rule_based(),
            context: ElementContext::default(),
            dependencies: Default::default(),
        }
    }

    fn decision(resolution: Resolution, confidence: f64) -> SupervisorDecision {
        SupervisorDecision {
            conflict_id: "quality_issue-001".to_string(),
            agents_involved: ["breakdown".to_string()].into(),
            conflict_type: ConflictType::QualityIssue,
            resolution,
            final_decision: json!({}),
            confidence,
            reasoning: vec![],
        }
    }

    #[test]
    fn empty_run_uses_the_documented_defaults() {
        let report = aggregate_confidence(
            &emotional(0.5),
            &TechnicalAnalysis::fallback_default(),
            &[],
            &[],
            DEFAULT_HUMAN_REVIEW_THRESHOLD,
        );
        // 0.2*0.5 + 0.3*1.0 + 0.3*0.0 + 0.2*0.8
        assert!((report.overall_confidence - 0.56).abs() < 1e-9);
        assert!(report.human_review_required);
    }

    #[test]
    fn invalid_technical_scores_point_three() {
        let technical = TechnicalAnalysis {
            is_valid: false,
            ..TechnicalAnalysis::fallback_default()
        };
        let report = aggregate_confidence(&emotional(1.0), &technical, &[], &[], 0.0);
        // 0.2*1.0 + 0.3*0.3 + 0.0 + 0.2*0.8
        assert!((report.overall_confidence - 0.45).abs() < 1e-9);
    }

    #[test]
    fn raising_one_element_confidence_never_lowers_overall() {
        let technical = TechnicalAnalysis::fallback_default();
        let low = [element(0.3), element(0.5)];
        let high = [element(0.9), element(0.5)];
        let before =
            aggregate_confidence(&emotional(0.5), &technical, &low, &[], 0.7).overall_confidence;
        let after =
            aggregate_confidence(&emotional(0.5), &technical, &high, &[], 0.7).overall_confidence;
        assert!(after >= before);
    }

    #[test]
    fn review_request_forces_the_flag_regardless_of_score() {
        let report = aggregate_confidence(
            &emotional(1.0),
            &TechnicalAnalysis::fallback_default(),
            &[element(1.0)],
            &[decision(Resolution::RequestHumanReview, 0.95)],
            0.0,
        );
        assert!(report.human_review_required);
    }

    #[test]
    fn low_confidence_decisions_become_critical_issues() {
        let report = aggregate_confidence(
            &emotional(1.0),
            &TechnicalAnalysis::fallback_default(),
            &[element(1.0)],
            &[decision(Resolution::MergeResults, 0.4)],
            0.0,
        );
        assert_eq!(report.critical_issues.len(), 1);
        assert!(report.human_review_required);
    }

    #[test]
    fn missing_elements_decisions_become_critical_issues() {
        let mut missing = decision(Resolution::MergeResults, 0.9);
        missing.conflict_type = ConflictType::MissingElements;
        let report = aggregate_confidence(
            &emotional(1.0),
            &TechnicalAnalysis::fallback_default(),
            &[element(1.0)],
            &[missing],
            0.0,
        );
        assert_eq!(report.critical_issues.len(), 1);
        assert!(report.human_review_required);
    }

    #[test]
    fn confident_run_needs_no_review() {
        let report = aggregate_confidence(
            &emotional(0.9),
            &TechnicalAnalysis::fallback_default(),
            &[element(0.9)],
            &[decision(Resolution::MergeResults, 0.9)],
            DEFAULT_HUMAN_REVIEW_THRESHOLD,
        );
        assert!(report.overall_confidence >= DEFAULT_HUMAN_REVIEW_THRESHOLD);
        assert!(!report.human_review_required);
    }
}
