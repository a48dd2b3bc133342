//! Production elements and their provenance.

use crate::{Category, Evidence};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Provenance record for an extracted element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// The extracting agent kind (e.g., "classification_engine")
    pub agent_type: String,
    /// Version of the extracting agent
    pub agent_version: String,
    /// Model identifier, or "rule_based" for the deterministic core
    pub model_used: String,
    /// Prompt version, or "none" for non-LLM extraction
    pub prompt_version: String,
    /// When the element was created
    pub timestamp: DateTime<Utc>,
}

impl Provenance {
    /// Provenance stamped by the deterministic rule-based core.
    pub fn rule_based() -> Self {
        Self {
            agent_type: "classification_engine".to_string(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            model_used: "rule_based".to_string(),
            prompt_version: "none".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Scene-level context attached to an element.
///
/// Only `scene_context` is always present; the remaining fields are the
/// documented-optional sub-fields of the emitted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ElementContext {
    /// Short description of the scene the element came from
    pub scene_context: String,
    /// Character associated with the element, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_context: Option<String>,
    /// Day/night or continuity timing note, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_context: Option<String>,
    /// Location note, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_context: Option<String>,
}

/// A detected item, person-role, or service relevant to production planning.
///
/// Created by the classification engine; immutable once created. Later
/// pipeline stages filter elements, they never mutate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionElement {
    /// Unique id, `<scene_id>-<category>-<ordinal>`
    pub id: String,
    /// Taxonomy category
    pub category: Category,
    /// Element name (the extracted excerpt, trimmed)
    pub name: String,
    /// Display description, `<category display name>: <extracted text>`
    pub description: String,
    /// Scene the element was extracted from
    pub scene_id: String,
    /// The evidence backing the classification
    pub evidence: Evidence,
    /// Confidence in [0, 1]; always equals `evidence.confidence`
    pub confidence: f64,
    /// Who extracted the element
    pub extracted_by: Provenance,
    /// Scene-level context
    pub context: ElementContext,
    /// Ids of elements this element depends on
    pub dependencies: BTreeSet<String>,
}
