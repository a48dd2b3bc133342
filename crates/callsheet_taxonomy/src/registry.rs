//! Loading and validating the taxonomy rule table.
//!
//! The registry ships with bundled defaults (`include_str!` of
//! `taxonomy.toml`) and can be replaced wholesale by an override file.
//! Validation happens entirely at load time: every category must have
//! exactly one rule, every pattern must compile, every threshold must be
//! in range. After load the registry is read-only for the process lifetime.

use crate::rule::ClassificationRule;
use callsheet_core::Category;
use callsheet_error::{CallsheetResult, TaxonomyError, TaxonomyErrorKind};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Bundled default rule table.
const BUNDLED_TAXONOMY: &str = include_str!("../taxonomy.toml");

/// Intermediate structure for deserializing one `[rules.<category>]` table.
#[derive(Debug, Clone, Deserialize)]
struct TomlRule {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    context_patterns: Vec<String>,
    #[serde(default)]
    exclusion_patterns: Vec<String>,
    confidence_threshold: f64,
    priority: i32,
}

/// Intermediate structure for the whole registry file.
#[derive(Debug, Clone, Deserialize)]
struct TomlRegistry {
    rules: HashMap<String, TomlRule>,
}

/// The fixed set of categories and their matching rules.
///
/// # Examples
///
/// ```
/// use callsheet_taxonomy::TaxonomyRegistry;
///
/// let registry = TaxonomyRegistry::bundled().unwrap();
/// assert_eq!(registry.rules().len(), 21);
/// ```
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    /// Rules sorted by priority ascending
    rules: Vec<ClassificationRule>,
}

impl TaxonomyRegistry {
    /// Load the bundled default rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled table fails validation: a build
    /// defect, surfaced as a fatal configuration error rather than a panic.
    pub fn bundled() -> CallsheetResult<Self> {
        Self::from_toml_str(BUNDLED_TAXONOMY)
    }

    /// Load a rule table from a TOML file, replacing the bundle wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> CallsheetResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TaxonomyError::new(TaxonomyErrorKind::FileRead(e.to_string()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a rule table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, a table key is not one of
    /// the 21 categories, a category is missing, a pattern fails to
    /// compile, or a threshold is outside [0, 1].
    pub fn from_toml_str(content: &str) -> CallsheetResult<Self> {
        let parsed: TomlRegistry = toml::from_str(content)
            .map_err(|e| TaxonomyError::new(TaxonomyErrorKind::TomlParse(e.to_string())))?;

        let mut rules = Vec::with_capacity(parsed.rules.len());
        for (key, toml_rule) in &parsed.rules {
            let category = Category::from_str(key).map_err(|_| {
                TaxonomyError::new(TaxonomyErrorKind::UnknownCategory(key.clone()))
            })?;
            rules.push(build_rule(category, toml_rule)?);
        }

        for category in Category::iter() {
            if !rules.iter().any(|r| *r.category() == category) {
                return Err(TaxonomyError::new(TaxonomyErrorKind::MissingRule(
                    category.to_string(),
                ))
                .into());
            }
        }

        rules.sort_by_key(|r| *r.priority());
        debug!(rule_count = rules.len(), "Loaded taxonomy registry");
        Ok(Self { rules })
    }

    /// All rules, sorted by priority ascending.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// The rule for one category.
    pub fn rule_for(&self, category: Category) -> Option<&ClassificationRule> {
        self.rules.iter().find(|r| *r.category() == category)
    }
}

fn build_rule(category: Category, toml_rule: &TomlRule) -> CallsheetResult<ClassificationRule> {
    if !(0.0..=1.0).contains(&toml_rule.confidence_threshold) {
        return Err(TaxonomyError::new(TaxonomyErrorKind::InvalidThreshold {
            category: category.to_string(),
            value: toml_rule.confidence_threshold.to_string(),
        })
        .into());
    }

    let context_patterns = compile_patterns(category, &toml_rule.context_patterns)?;
    let exclusion_patterns = compile_patterns(category, &toml_rule.exclusion_patterns)?;

    Ok(ClassificationRule::new(
        category,
        toml_rule.keywords.clone(),
        context_patterns,
        exclusion_patterns,
        toml_rule.confidence_threshold,
        toml_rule.priority,
    ))
}

fn compile_patterns(category: Category, sources: &[String]) -> CallsheetResult<Vec<Regex>> {
    sources
        .iter()
        .map(|source| {
            Regex::new(source).map_err(|e| {
                TaxonomyError::new(TaxonomyErrorKind::InvalidPattern {
                    pattern: source.clone(),
                    category: category.to_string(),
                    message: e.to_string(),
                })
                .into()
            })
        })
        .collect()
}
