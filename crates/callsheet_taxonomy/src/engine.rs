//! The classification engine: text units in, production elements out.

use crate::matcher::{match_rule, RuleMatch};
use crate::TaxonomyRegistry;
use callsheet_core::{Category, ElementContext, Evidence, ProductionElement, Provenance};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fragments shorter than this (in chars, trimmed) are discarded.
const MIN_UNIT_CHARS: usize = 5;
/// Scene context strings are truncated to this many chars.
const SCENE_CONTEXT_CHARS: usize = 80;

/// Runs the rule matcher over the full registry and builds typed elements.
///
/// The engine is deterministic: classifying identical `(text, context)`
/// against an unchanged registry yields identical category, confidence,
/// and evidence span. It is cheap to clone; clones share the registry.
///
/// # Examples
///
/// ```
/// use callsheet_taxonomy::{ClassificationEngine, TaxonomyRegistry};
///
/// let engine = ClassificationEngine::new(TaxonomyRegistry::bundled().unwrap());
/// let elements = engine.classify_multiple("أحمد يحمل كوب قهوة.", "scene-1");
/// assert!(!elements.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    registry: Arc<TaxonomyRegistry>,
}

impl ClassificationEngine {
    /// Create an engine over a loaded registry.
    pub fn new(registry: TaxonomyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The registry this engine classifies against.
    pub fn registry(&self) -> &TaxonomyRegistry {
        &self.registry
    }

    /// Classify one text fragment, returning the best-scoring element.
    ///
    /// Candidates are sorted by confidence descending; exact ties break by
    /// rule priority ascending (lower integer wins). Returns `None` when no
    /// rule clears its own threshold; degenerate input is not an error.
    #[instrument(skip_all, fields(scene_id = %scene_id, text_len = text.len()))]
    pub fn classify(
        &self,
        text: &str,
        context: &str,
        scene_id: &str,
    ) -> Option<ProductionElement> {
        let hit = self.best_match(text, context)?;
        let context_text = if context.trim().is_empty() { text } else { context };
        Some(build_element(&hit, text, 0, context_text, scene_id, 1))
    }

    /// Split `text` into sentence-like units and classify each independently.
    ///
    /// Units are delimited by `.`, `!`, `?`, `؟`, and newlines; trimmed
    /// fragments under 5 characters are discarded. Results are deduplicated
    /// by `(category, lowercased name)`, keeping the first occurrence.
    #[instrument(skip_all, fields(scene_id = %scene_id, text_len = text.len()))]
    pub fn classify_multiple(&self, text: &str, scene_id: &str) -> Vec<ProductionElement> {
        let hits = split_units(text)
            .into_iter()
            .filter_map(|(offset, unit)| {
                // Units classify independently: no cross-sentence context,
                // otherwise one keyword would bleed into every unit.
                self.best_match(unit, "").map(|hit| (offset, unit.to_string(), hit))
            })
            .collect();
        self.assemble(hits, text, scene_id)
    }

    /// Concurrent variant of [`Self::classify_multiple`].
    ///
    /// Each unit's classification is a pure function of (unit text,
    /// registry), so units fan out across blocking worker tasks and
    /// join back in original sentence order before deduplication, since dedup is
    /// first-occurrence-wins, so ordering must be restored first. Produces
    /// identical results to the sequential path.
    pub async fn classify_multiple_concurrent(
        &self,
        text: &str,
        scene_id: &str,
    ) -> Vec<ProductionElement> {
        let handles: Vec<_> = split_units(text)
            .into_iter()
            .map(|(offset, unit)| {
                let engine = self.clone();
                let unit = unit.to_string();
                tokio::task::spawn_blocking(move || {
                    engine.best_match(&unit, "").map(|hit| (offset, unit, hit))
                })
            })
            .collect();

        let mut hits = Vec::new();
        // join_all preserves spawn order, which is original sentence order.
        for joined in futures::future::join_all(handles).await {
            let outcome = joined.expect("classification worker panicked");
            if let Some(hit) = outcome {
                hits.push(hit);
            }
        }
        self.assemble(hits, text, scene_id)
    }

    /// Run every rule and pick the winning candidate.
    fn best_match(&self, text: &str, context: &str) -> Option<RuleMatch> {
        let mut candidates: Vec<RuleMatch> = self
            .registry
            .rules()
            .iter()
            .filter_map(|rule| match_rule(rule, text, context))
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.priority.cmp(&b.priority))
        });
        candidates.into_iter().next()
    }

    /// Dedup unit hits and assign ids, in original sentence order.
    fn assemble(
        &self,
        hits: Vec<(usize, String, RuleMatch)>,
        full_text: &str,
        scene_id: &str,
    ) -> Vec<ProductionElement> {
        let mut seen: HashSet<(Category, String)> = HashSet::new();
        let mut ordinals: HashMap<Category, usize> = HashMap::new();
        let mut elements = Vec::new();

        for (offset, unit, hit) in hits {
            let name = hit.excerpt.trim().to_string();
            if !seen.insert((hit.category, name.to_lowercase())) {
                continue;
            }
            let ordinal = ordinals.entry(hit.category).or_insert(0);
            *ordinal += 1;
            elements.push(build_element(&hit, &unit, offset, full_text, scene_id, *ordinal));
        }

        debug!(
            element_count = elements.len(),
            scene_id = %scene_id,
            "Assembled classified elements"
        );
        elements
    }
}

/// Build a typed element from a rule match.
///
/// `unit_offset` remaps the match's unit-relative span into the source
/// text the unit was split from, so evidence spans always index the text
/// the caller supplied.
fn build_element(
    hit: &RuleMatch,
    unit: &str,
    unit_offset: usize,
    context_text: &str,
    scene_id: &str,
    ordinal: usize,
) -> ProductionElement {
    debug_assert!(unit.get(hit.span_start..hit.span_end).is_some());

    let name = hit.excerpt.trim().to_string();
    let rationale = format!(
        "classified as {} because: keywords [{}] and {} contextual pattern(s)",
        hit.category,
        hit.matched_keywords.join(", "),
        hit.pattern_hits
    );
    let evidence = Evidence {
        span_start: unit_offset + hit.span_start,
        span_end: unit_offset + hit.span_end,
        text_excerpt: hit.excerpt.clone(),
        rationale,
        confidence: hit.confidence,
    };

    ProductionElement {
        id: format!("{}-{}-{:03}", scene_id, hit.category, ordinal),
        category: hit.category,
        name,
        description: format!("{}: {}", hit.category.display_name(), hit.excerpt.trim()),
        scene_id: scene_id.to_string(),
        evidence,
        confidence: hit.confidence,
        extracted_by: Provenance::rule_based(),
        context: ElementContext {
            scene_context: scene_context_of(context_text),
            ..ElementContext::default()
        },
        dependencies: Default::default(),
    }
}

/// First non-empty line of the source, truncated for context display.
fn scene_context_of(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    match line.char_indices().nth(SCENE_CONTEXT_CHARS) {
        Some((idx, _)) => line[..idx].to_string(),
        None => line.to_string(),
    }
}

/// Split text into sentence-like units with their byte offsets.
fn split_units(text: &str) -> Vec<(usize, &str)> {
    let mut units = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '؟' | '\n') {
            push_unit(text, start, i, &mut units);
            start = i + ch.len_utf8();
        }
    }
    push_unit(text, start, text.len(), &mut units);
    units
}

fn push_unit<'a>(text: &'a str, start: usize, end: usize, units: &mut Vec<(usize, &'a str)>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.chars().count() >= MIN_UNIT_CHARS {
        let lead = raw.len() - raw.trim_start().len();
        units.push((start + lead, trimmed));
    }
}
