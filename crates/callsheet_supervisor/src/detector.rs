//! Detecting conflicts between the analysis reads.

use callsheet_core::{
    BreakdownAnalysis, Category, Conflict, ConflictType, EmotionalAnalysis, ProductionElement,
    Severity, TechnicalAnalysis,
};
use serde_json::json;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Audience engagement at or above this contradicts an invalid technical read.
const HIGH_ENGAGEMENT: f64 = 0.7;

/// Domain plausibility check for one extracted element.
///
/// The detector itself stays generic; what counts as "logical" for a given
/// production is pluggable behind this trait.
pub trait ElementLogicCheck: Send + Sync {
    /// Whether the element is plausible given the technical read.
    fn is_logical(&self, element: &ProductionElement, technical: &TechnicalAnalysis) -> bool;
}

/// Default plausibility check.
///
/// Flags a picture vehicle extracted from a script whose every scene header
/// is interior; everything else passes.
pub struct DefaultLogicCheck;

impl ElementLogicCheck for DefaultLogicCheck {
    fn is_logical(&self, element: &ProductionElement, technical: &TechnicalAnalysis) -> bool {
        if element.category == Category::Vehicles
            && !technical.scene_headers.is_empty()
            && technical.scene_headers.iter().all(|h| h.int_ext == "داخلي")
        {
            return false;
        }
        true
    }
}

/// Compares outputs of the three analysis stages and raises typed conflicts.
///
/// The four checks are independent and deterministic; the detector never
/// deduplicates or merges across check types. Conflict ids are unique
/// within the producing run.
pub struct ConflictDetector {
    logic: Box<dyn ElementLogicCheck>,
    confidence_threshold: f64,
}

impl ConflictDetector {
    /// Create a detector with the default plausibility check.
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            logic: Box::new(DefaultLogicCheck),
            confidence_threshold,
        }
    }

    /// Replace the plausibility check.
    pub fn with_logic_check(mut self, check: Box<dyn ElementLogicCheck>) -> Self {
        self.logic = check;
        self
    }

    /// Run all four checks over the stage outputs.
    #[instrument(skip_all)]
    pub fn detect(
        &self,
        emotional: &EmotionalAnalysis,
        technical: &TechnicalAnalysis,
        breakdown: &BreakdownAnalysis,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        self.check_classification(technical, breakdown, &mut conflicts);
        self.check_missing_elements(technical, breakdown, &mut conflicts);
        self.check_quality(breakdown, &mut conflicts);
        self.check_inconsistency(emotional, technical, &mut conflicts);
        debug!(conflict_count = conflicts.len(), "Conflict detection finished");
        conflicts
    }

    /// One medium conflict per element the plausibility check rejects.
    fn check_classification(
        &self,
        technical: &TechnicalAnalysis,
        breakdown: &BreakdownAnalysis,
        conflicts: &mut Vec<Conflict>,
    ) {
        let mut seq = 0;
        for element in &breakdown.elements {
            if self.logic.is_logical(element, technical) {
                continue;
            }
            seq += 1;
            conflicts.push(Conflict {
                conflict_id: conflict_id(ConflictType::ClassificationConflict, seq),
                conflict_type: ConflictType::ClassificationConflict,
                severity: Severity::Medium,
                description: format!(
                    "element '{}' ({}) contradicts the technical read",
                    element.name, element.category
                ),
                agents_involved: agents(&["breakdown", "technical"]),
                evidence: json!({
                    "element_id": element.id,
                    "category": element.category,
                    "name": element.name,
                }),
            });
        }
    }

    /// One conflict per expected element no extracted name contains.
    fn check_missing_elements(
        &self,
        technical: &TechnicalAnalysis,
        breakdown: &BreakdownAnalysis,
        conflicts: &mut Vec<Conflict>,
    ) {
        let mut seq = 0;
        for expected in &technical.expected_elements {
            let label = expected.label.to_lowercase();
            let found = breakdown
                .elements
                .iter()
                .any(|e| e.name.to_lowercase().contains(&label));
            if found {
                continue;
            }
            seq += 1;
            conflicts.push(Conflict {
                conflict_id: conflict_id(ConflictType::MissingElements, seq),
                conflict_type: ConflictType::MissingElements,
                severity: if expected.critical {
                    Severity::High
                } else {
                    Severity::Medium
                },
                description: format!(
                    "expected element '{}' was not extracted",
                    expected.label
                ),
                agents_involved: agents(&["technical", "breakdown"]),
                evidence: json!({ "expected": expected.label, "critical": expected.critical }),
            });
        }
    }

    /// One high conflict summarizing all below-threshold elements, if any.
    fn check_quality(&self, breakdown: &BreakdownAnalysis, conflicts: &mut Vec<Conflict>) {
        let low: Vec<&ProductionElement> = breakdown
            .elements
            .iter()
            .filter(|e| e.confidence < self.confidence_threshold)
            .collect();
        if low.is_empty() {
            return;
        }
        conflicts.push(Conflict {
            conflict_id: conflict_id(ConflictType::QualityIssue, 1),
            conflict_type: ConflictType::QualityIssue,
            severity: Severity::High,
            description: format!(
                "{} element(s) fall below the confidence threshold {:.2}",
                low.len(),
                self.confidence_threshold
            ),
            agents_involved: agents(&["breakdown"]),
            evidence: json!({
                "element_ids": low.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
                "threshold": self.confidence_threshold,
            }),
        });
    }

    /// One medium conflict per reported character inconsistency, plus a
    /// cross-stage conflict when an invalid technical read coincides with
    /// high reported audience engagement.
    fn check_inconsistency(
        &self,
        emotional: &EmotionalAnalysis,
        technical: &TechnicalAnalysis,
        conflicts: &mut Vec<Conflict>,
    ) {
        let mut seq = 0;
        for issue in &technical.character_consistency.inconsistencies {
            seq += 1;
            conflicts.push(Conflict {
                conflict_id: conflict_id(ConflictType::Inconsistency, seq),
                conflict_type: ConflictType::Inconsistency,
                severity: Severity::Medium,
                description: format!("character inconsistency: {issue}"),
                agents_involved: agents(&["technical"]),
                evidence: json!({ "inconsistency": issue }),
            });
        }

        if !technical.is_valid && emotional.audience_engagement >= HIGH_ENGAGEMENT {
            seq += 1;
            conflicts.push(Conflict {
                conflict_id: conflict_id(ConflictType::Inconsistency, seq),
                conflict_type: ConflictType::Inconsistency,
                severity: Severity::Medium,
                description: format!(
                    "audience engagement {:.2} reported against an invalid technical read",
                    emotional.audience_engagement
                ),
                agents_involved: agents(&["emotional", "technical"]),
                evidence: json!({
                    "audience_engagement": emotional.audience_engagement,
                    "technical_is_valid": technical.is_valid,
                }),
            });
        }
    }
}

fn conflict_id(conflict_type: ConflictType, seq: usize) -> String {
    format!("{conflict_type}-{seq:03}")
}

fn agents(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsheet_core::{AnalysisSource, CharacterConsistency, ExpectedElement, SceneHeader};

    fn emotional(engagement: f64) -> EmotionalAnalysis {
        EmotionalAnalysis {
            audience_engagement: engagement,
            ..EmotionalAnalysis::fallback_default()
        }
    }

    #[test]
    fn invalid_technical_with_high_engagement_raises_cross_stage_conflict() {
        let technical = TechnicalAnalysis {
            is_valid: false,
            ..TechnicalAnalysis::fallback_default()
        };
        let breakdown = BreakdownAnalysis::fallback_default();
        let conflicts =
            ConflictDetector::new(0.5).detect(&emotional(0.9), &technical, &breakdown);

        let cross = conflicts
            .iter()
            .find(|c| {
                c.agents_involved.contains("emotional") && c.agents_involved.contains("technical")
            })
            .expect("expected a cross-stage conflict");
        assert_eq!(cross.conflict_type, ConflictType::Inconsistency);
    }

    #[test]
    fn valid_technical_raises_no_cross_stage_conflict() {
        let conflicts = ConflictDetector::new(0.5).detect(
            &emotional(0.9),
            &TechnicalAnalysis::fallback_default(),
            &BreakdownAnalysis::fallback_default(),
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn missing_critical_element_is_high_severity() {
        let technical = TechnicalAnalysis {
            expected_elements: vec![
                ExpectedElement {
                    label: "أحمد".to_string(),
                    critical: true,
                },
                ExpectedElement {
                    label: "كوب".to_string(),
                    critical: false,
                },
            ],
            ..TechnicalAnalysis::fallback_default()
        };
        let conflicts = ConflictDetector::new(0.5).detect(
            &emotional(0.5),
            &technical,
            &BreakdownAnalysis::fallback_default(),
        );

        assert_eq!(conflicts.len(), 2);
        assert!(conflicts
            .iter()
            .all(|c| c.conflict_type == ConflictType::MissingElements));
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[1].severity, Severity::Medium);
    }

    #[test]
    fn one_inconsistency_conflict_per_reported_entry() {
        let technical = TechnicalAnalysis {
            character_consistency: CharacterConsistency {
                inconsistencies: vec!["a".to_string(), "b".to_string()],
            },
            ..TechnicalAnalysis::fallback_default()
        };
        let conflicts = ConflictDetector::new(0.5).detect(
            &emotional(0.5),
            &technical,
            &BreakdownAnalysis::fallback_default(),
        );
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn conflict_ids_are_unique_within_a_run() {
        let technical = TechnicalAnalysis {
            is_valid: false,
            expected_elements: vec![ExpectedElement {
                label: "أحمد".to_string(),
                critical: true,
            }],
            character_consistency: CharacterConsistency {
                inconsistencies: vec!["x".to_string()],
            },
            ..TechnicalAnalysis::fallback_default()
        };
        let conflicts =
            ConflictDetector::new(0.5).detect(&emotional(0.9), &technical, &breakdown_with_low());
        let mut ids: Vec<&str> = conflicts.iter().map(|c| c.conflict_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), conflicts.len());
    }

    fn breakdown_with_low() -> BreakdownAnalysis {
        BreakdownAnalysis::from_elements(Vec::new(), AnalysisSource::Fallback)
    }

    #[test]
    fn interior_only_script_flags_vehicles() {
        use callsheet_core::{ElementContext, Evidence, Provenance};

        let technical = TechnicalAnalysis {
            scene_headers: vec![SceneHeader {
                scene_number: "1".to_string(),
                int_ext: "داخلي".to_string(),
                day_night: "ليل".to_string(),
                location: "شقة".to_string(),
            }],
            ..TechnicalAnalysis::fallback_default()
        };
        let element = ProductionElement {
            id: "scene-1-vehicles-001".to_string(),
            category: Category::Vehicles,
            name: "سيارة".to_string(),
            description: "مركبات: سيارة".to_string(),
            scene_id: "scene-1".to_string(),
            evidence: Evidence {
                span_start: 0,
                span_end: 10,
                text_excerpt: "سيارة".to_string(),
                rationale: "test".to_string(),
                confidence: 0.6,
            },
            confidence: 0.6,
            extracted_by: Provenance::rule_based(),
            context: ElementContext::default(),
            dependencies: Default::default(),
        };
        let breakdown =
            BreakdownAnalysis::from_elements(vec![element], AnalysisSource::Fallback);
        let conflicts = ConflictDetector::new(0.5).detect(&emotional(0.5), &technical, &breakdown);

        assert!(conflicts
            .iter()
            .any(|c| c.conflict_type == ConflictType::ClassificationConflict));
    }
}
