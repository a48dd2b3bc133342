//! The supervisor: rule-driven conflict resolution.

use callsheet_core::{Conflict, ConflictType, Resolution, SupervisorDecision};
use callsheet_error::{CallsheetResult, SupervisorError, SupervisorErrorKind};
use derive_getters::Getters;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default rule set.
const BUNDLED_RULES: &str = include_str!("../supervisor.toml");

/// Intermediate structure for one `[[rules]]` entry.
#[derive(Debug, Clone, Deserialize)]
struct TomlSupervisorRule {
    priority: i32,
    condition: TomlCondition,
    action: TomlAction,
    confidence_threshold: f64,
}

/// Intermediate structure for a rule condition.
///
/// `conflict_type` deserializes into the typed enum, so a rule referencing
/// an undefined condition type fails at load: a fatal configuration error,
/// never a silent runtime surprise.
#[derive(Debug, Clone, Deserialize)]
struct TomlCondition {
    conflict_type: ConflictType,
    #[serde(default)]
    agents_involved: Vec<String>,
}

/// Intermediate structure for a rule action.
#[derive(Debug, Clone, Deserialize)]
struct TomlAction {
    action_type: Resolution,
    confidence: f64,
    #[serde(default)]
    parameters: toml::Table,
}

/// Intermediate structure for the whole rule file.
#[derive(Debug, Clone, Deserialize)]
struct TomlRuleSet {
    rules: Vec<TomlSupervisorRule>,
}

/// One loaded supervisor rule.
#[derive(Debug, Clone, Getters)]
pub struct SupervisorRule {
    /// Evaluation order; lower evaluates first
    priority: i32,
    /// Conflict type this rule applies to
    condition_type: ConflictType,
    /// Agent set that must be a subset of the conflict's agents
    condition_agents: BTreeSet<String>,
    /// Resolution the rule applies
    action: Resolution,
    /// Confidence recorded on decisions this rule produces
    action_confidence: f64,
    /// Opaque action parameters passed through to the decision payload
    parameters: serde_json::Value,
    /// Below this, the action is downgraded to a human-review request
    confidence_threshold: f64,
}

/// Per-run decision store, keyed by conflict id.
///
/// One instance exists per pipeline execution, never a process-wide
/// singleton, so independent runs over different scripts share nothing.
/// Recording a decision for an already-resolved conflict overwrites the
/// entry; resolution is a pure function of (conflict, rule set), so the
/// overwrite is idempotent.
#[derive(Debug, Clone, Default)]
pub struct DecisionHistory {
    decisions: Vec<SupervisorDecision>,
}

impl DecisionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision, replacing any prior decision for the same conflict.
    pub fn record(&mut self, decision: SupervisorDecision) {
        match self
            .decisions
            .iter_mut()
            .find(|d| d.conflict_id == decision.conflict_id)
        {
            Some(existing) => *existing = decision,
            None => self.decisions.push(decision),
        }
    }

    /// The decision for one conflict, if recorded.
    pub fn get(&self, conflict_id: &str) -> Option<&SupervisorDecision> {
        self.decisions.iter().find(|d| d.conflict_id == conflict_id)
    }

    /// All decisions, in first-recorded order.
    pub fn decisions(&self) -> &[SupervisorDecision] {
        &self.decisions
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether no decision has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Matches conflicts against an ordered rule set and emits decisions.
///
/// # Examples
///
/// ```
/// use callsheet_supervisor::Supervisor;
///
/// let supervisor = Supervisor::bundled().unwrap();
/// assert!(!supervisor.rules().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Supervisor {
    /// Rules sorted by priority ascending
    rules: Vec<SupervisorRule>,
}

impl Supervisor {
    /// Load the bundled default rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled rules fail validation.
    pub fn bundled() -> CallsheetResult<Self> {
        Self::from_toml_str(BUNDLED_RULES)
    }

    /// Load a rule set from a TOML file, replacing the bundle wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> CallsheetResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SupervisorError::new(SupervisorErrorKind::FileRead(e.to_string()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a rule set from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, the rule set is empty, a
    /// condition or action type is unknown, or a confidence is out of range.
    pub fn from_toml_str(content: &str) -> CallsheetResult<Self> {
        let parsed: TomlRuleSet = toml::from_str(content)
            .map_err(|e| SupervisorError::new(SupervisorErrorKind::TomlParse(e.to_string())))?;
        if parsed.rules.is_empty() {
            return Err(SupervisorError::new(SupervisorErrorKind::EmptyRuleSet).into());
        }

        let mut rules = Vec::with_capacity(parsed.rules.len());
        for toml_rule in parsed.rules {
            for value in [toml_rule.action.confidence, toml_rule.confidence_threshold] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(SupervisorError::new(SupervisorErrorKind::InvalidConfidence {
                        priority: toml_rule.priority,
                        value: value.to_string(),
                    })
                    .into());
                }
            }
            let parameters = serde_json::to_value(&toml_rule.action.parameters)
                .map_err(|e| SupervisorError::new(SupervisorErrorKind::TomlParse(e.to_string())))?;
            rules.push(SupervisorRule {
                priority: toml_rule.priority,
                condition_type: toml_rule.condition.conflict_type,
                condition_agents: toml_rule.condition.agents_involved.into_iter().collect(),
                action: toml_rule.action.action_type,
                action_confidence: toml_rule.action.confidence,
                parameters,
                confidence_threshold: toml_rule.confidence_threshold,
            });
        }

        rules.sort_by_key(|r| r.priority);
        debug!(rule_count = rules.len(), "Loaded supervisor rules");
        Ok(Self { rules })
    }

    /// The loaded rules, sorted by priority ascending.
    pub fn rules(&self) -> &[SupervisorRule] {
        &self.rules
    }

    /// Resolve one conflict and record the decision in the run's history.
    ///
    /// The first rule (in ascending priority order) whose condition type
    /// equals the conflict's type and whose agent set is a subset of the
    /// conflict's agents is applied. With no matching rule the decision is
    /// the conservative default: request human review at confidence 0.5.
    #[instrument(skip_all, fields(conflict_id = %conflict.conflict_id))]
    pub fn resolve(&self, conflict: &Conflict, history: &mut DecisionHistory) -> SupervisorDecision {
        let matched = self.rules.iter().find(|rule| {
            rule.condition_type == conflict.conflict_type
                && rule.condition_agents.is_subset(&conflict.agents_involved)
        });

        let decision = match matched {
            Some(rule) => apply_rule(rule, conflict),
            None => default_decision(conflict),
        };

        debug!(
            resolution = %decision.resolution,
            confidence = decision.confidence,
            "Resolved conflict"
        );
        history.record(decision.clone());
        decision
    }
}

fn apply_rule(rule: &SupervisorRule, conflict: &Conflict) -> SupervisorDecision {
    let mut resolution = rule.action;
    let mut reasoning = vec![
        format!("matched supervisor rule at priority {}", rule.priority),
        format!("applied action {}", rule.action),
    ];
    if rule.action_confidence < rule.confidence_threshold {
        resolution = Resolution::RequestHumanReview;
        reasoning.push("action confidence below rule threshold".to_string());
    }

    SupervisorDecision {
        conflict_id: conflict.conflict_id.clone(),
        agents_involved: conflict.agents_involved.clone(),
        conflict_type: conflict.conflict_type,
        resolution,
        final_decision: json!({
            "action": rule.action.to_string(),
            "parameters": rule.parameters,
            "conflict_description": conflict.description,
        }),
        confidence: rule.action_confidence,
        reasoning,
    }
}

fn default_decision(conflict: &Conflict) -> SupervisorDecision {
    SupervisorDecision {
        conflict_id: conflict.conflict_id.clone(),
        agents_involved: conflict.agents_involved.clone(),
        conflict_type: conflict.conflict_type,
        resolution: Resolution::RequestHumanReview,
        final_decision: json!({ "disposition": "human_review" }),
        confidence: 0.5,
        reasoning: vec![
            "no matching rule".to_string(),
            "human review required".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsheet_core::Severity;

    fn conflict(conflict_type: ConflictType, agents: &[&str]) -> Conflict {
        Conflict {
            conflict_id: "test-001".to_string(),
            conflict_type,
            severity: Severity::Medium,
            description: "test conflict".to_string(),
            agents_involved: agents.iter().map(|a| a.to_string()).collect(),
            evidence: json!({}),
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let toml = r#"
            [[rules]]
            priority = 2
            confidence_threshold = 0.5
            condition = { conflict_type = "quality_issue" }
            action = { action_type = "escalate", confidence = 0.9 }

            [[rules]]
            priority = 1
            confidence_threshold = 0.5
            condition = { conflict_type = "quality_issue" }
            action = { action_type = "merge_results", confidence = 0.8 }
        "#;
        let supervisor = Supervisor::from_toml_str(toml).unwrap();
        let mut history = DecisionHistory::new();
        let decision = supervisor.resolve(
            &conflict(ConflictType::QualityIssue, &["breakdown"]),
            &mut history,
        );
        // Priority 1 evaluates before priority 2.
        assert_eq!(decision.resolution, Resolution::MergeResults);
    }

    #[test]
    fn agent_condition_must_be_a_subset() {
        let toml = r#"
            [[rules]]
            priority = 1
            confidence_threshold = 0.5
            condition = { conflict_type = "inconsistency", agents_involved = ["emotional"] }
            action = { action_type = "merge_results", confidence = 0.8 }
        "#;
        let supervisor = Supervisor::from_toml_str(toml).unwrap();
        let mut history = DecisionHistory::new();

        let miss = supervisor.resolve(
            &conflict(ConflictType::Inconsistency, &["technical"]),
            &mut history,
        );
        assert_eq!(miss.resolution, Resolution::RequestHumanReview);
        assert_eq!(miss.confidence, 0.5);
        assert_eq!(
            miss.reasoning,
            vec!["no matching rule".to_string(), "human review required".to_string()]
        );

        let hit = supervisor.resolve(
            &conflict(ConflictType::Inconsistency, &["emotional", "technical"]),
            &mut history,
        );
        assert_eq!(hit.resolution, Resolution::MergeResults);
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let supervisor = Supervisor::bundled().unwrap();
        let mut history = DecisionHistory::new();
        let conflict = conflict(ConflictType::QualityIssue, &["breakdown"]);

        let first = supervisor.resolve(&conflict, &mut history);
        let second = supervisor.resolve(&conflict, &mut history);
        assert_eq!(first, second);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn low_action_confidence_downgrades_to_human_review() {
        let toml = r#"
            [[rules]]
            priority = 1
            confidence_threshold = 0.9
            condition = { conflict_type = "quality_issue" }
            action = { action_type = "merge_results", confidence = 0.4 }
        "#;
        let supervisor = Supervisor::from_toml_str(toml).unwrap();
        let mut history = DecisionHistory::new();
        let decision = supervisor.resolve(
            &conflict(ConflictType::QualityIssue, &["breakdown"]),
            &mut history,
        );
        assert_eq!(decision.resolution, Resolution::RequestHumanReview);
    }

    #[test]
    fn unknown_condition_type_fails_at_load() {
        let toml = r#"
            [[rules]]
            priority = 1
            confidence_threshold = 0.5
            condition = { conflict_type = "cosmic_rays" }
            action = { action_type = "merge_results", confidence = 0.8 }
        "#;
        assert!(Supervisor::from_toml_str(toml).is_err());
    }

    #[test]
    fn empty_rule_set_fails_at_load() {
        assert!(Supervisor::from_toml_str("rules = []").is_err());
    }

    #[test]
    fn out_of_range_confidence_fails_at_load() {
        let toml = r#"
            [[rules]]
            priority = 1
            confidence_threshold = 0.5
            condition = { conflict_type = "quality_issue" }
            action = { action_type = "merge_results", confidence = 1.4 }
        "#;
        assert!(Supervisor::from_toml_str(toml).is_err());
    }
}
