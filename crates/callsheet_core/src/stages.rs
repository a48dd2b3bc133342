//! Typed result schemas for the three analysis reads.
//!
//! The collaborator returns loosely structured JSON; each task has an
//! explicit schema here, validated on receipt. When validation fails the
//! pipeline substitutes a statically-defined fallback value instead of
//! propagating untyped data through the core.

use crate::ProductionElement;
use serde::{Deserialize, Serialize};

/// Which path produced a stage result.
///
/// Log-only provenance: this is deliberately not serialized into the final
/// report, where fallback use is visible only through lower confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisSource {
    /// The external analysis collaborator
    Collaborator,
    /// The local deterministic heuristic
    #[default]
    Fallback,
}

/// Result of the emotional read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalAnalysis {
    /// Dominant tone of the script
    pub tone: String,
    /// Predicted audience engagement in [0, 1]
    pub audience_engagement: f64,
    /// Ordered emotional beats
    #[serde(default)]
    pub emotional_arc: Vec<String>,
    /// Which path produced this value (log-only)
    #[serde(skip, default)]
    pub source: AnalysisSource,
}

impl EmotionalAnalysis {
    /// Static default used when no analysis could be produced at all.
    pub fn fallback_default() -> Self {
        Self {
            tone: "محايد".to_string(),
            audience_engagement: 0.5,
            emotional_arc: Vec::new(),
            source: AnalysisSource::Fallback,
        }
    }
}

/// A parsed scene header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneHeader {
    /// Scene number as written in the script
    pub scene_number: String,
    /// Interior/exterior, normalized to "داخلي" or "خارجي"
    pub int_ext: String,
    /// Time of day, normalized to "ليل" or "نهار"
    pub day_night: String,
    /// Location text from the header
    pub location: String,
}

/// An element the technical read expects the extraction to have found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedElement {
    /// Label to look for among extracted element names
    pub label: String,
    /// Whether absence of this element is a high-severity problem
    #[serde(default)]
    pub critical: bool,
}

/// Character-consistency findings from the technical read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CharacterConsistency {
    /// One entry per detected inconsistency
    #[serde(default)]
    pub inconsistencies: Vec<String>,
}

/// Result of the technical read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    /// Whether the script passed structural validation
    pub is_valid: bool,
    /// Parsed scene headers
    #[serde(default)]
    pub scene_headers: Vec<SceneHeader>,
    /// Elements the extraction is expected to find
    #[serde(default)]
    pub expected_elements: Vec<ExpectedElement>,
    /// Character-consistency findings
    #[serde(default)]
    pub character_consistency: CharacterConsistency,
    /// Which path produced this value (log-only)
    #[serde(skip, default)]
    pub source: AnalysisSource,
}

impl TechnicalAnalysis {
    /// Static default used when no analysis could be produced at all.
    pub fn fallback_default() -> Self {
        Self {
            is_valid: true,
            scene_headers: Vec::new(),
            expected_elements: Vec::new(),
            character_consistency: CharacterConsistency::default(),
            source: AnalysisSource::Fallback,
        }
    }
}

/// Result of the production-breakdown read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownAnalysis {
    /// Extracted production elements
    pub elements: Vec<ProductionElement>,
    /// Mean element confidence; 0 when no elements were extracted
    pub extraction_confidence: f64,
    /// Which path produced this value (log-only)
    #[serde(skip, default)]
    pub source: AnalysisSource,
}

impl BreakdownAnalysis {
    /// Build a breakdown result from extracted elements.
    ///
    /// `extraction_confidence` is the mean element confidence, 0 for an
    /// empty extraction (degenerate input is not an error).
    pub fn from_elements(elements: Vec<ProductionElement>, source: AnalysisSource) -> Self {
        let extraction_confidence = if elements.is_empty() {
            0.0
        } else {
            elements.iter().map(|e| e.confidence).sum::<f64>() / elements.len() as f64
        };
        Self {
            elements,
            extraction_confidence,
            source,
        }
    }

    /// Static default used when no analysis could be produced at all.
    pub fn fallback_default() -> Self {
        Self::from_elements(Vec::new(), AnalysisSource::Fallback)
    }
}
