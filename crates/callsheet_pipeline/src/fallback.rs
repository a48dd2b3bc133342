//! Deterministic per-stage fallback heuristics.
//!
//! When the collaborator is unavailable, slow, or returns something
//! unparseable, each stage substitutes a local, non-LLM result and the
//! pipeline proceeds. Fallback use is visible only through lower resulting
//! confidence, never through a distinct error field.

use callsheet_core::{
    AnalysisSource, CharacterConsistency, EmotionalAnalysis, ExpectedElement, SceneHeader,
    TechnicalAnalysis,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Engagement floor for the keyword heuristic.
const BASE_ENGAGEMENT: f64 = 0.4;
/// Engagement added per tone keyword hit.
const ENGAGEMENT_STEP: f64 = 0.1;
/// Engagement ceiling for the keyword heuristic.
const MAX_ENGAGEMENT: f64 = 0.9;

/// Tone buckets, evaluated in order; ties keep the earlier bucket.
const TONE_BUCKETS: [(&str, &[&str]); 3] = [
    ("متوتر", &["خوف", "صراخ", "انفجار", "مطاردة", "تهديد", "اشتباك"]),
    ("حزين", &["حزن", "بكاء", "دموع", "موت", "فقد"]),
    ("مبهج", &["فرح", "سعادة", "ضحك", "حب", "ابتسامة"]),
];

static SCENE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*مشهد\s*(\d+)\s*[-–:]?\s*(.*)$").expect("scene header pattern compiles")
});
static SPEAKER: LazyLock<Regex> = LazyLock::new(|| {
    // Space only, not \s: a speaker name never spans lines.
    Regex::new(r"(?m)^\s*([\p{Arabic}][\p{Arabic} ]{0,29}?) *:").expect("speaker pattern compiles")
});

/// Keyword-based tone and engagement heuristic for the emotional read.
pub fn fallback_emotional(text: &str) -> EmotionalAnalysis {
    let mut tone = "محايد";
    let mut best_hits = 0;
    let mut total_hits = 0;
    let mut arc = Vec::new();

    for (label, keywords) in TONE_BUCKETS {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        total_hits += hits;
        if hits > 0 {
            arc.push(label.to_string());
        }
        if hits > best_hits {
            best_hits = hits;
            tone = label;
        }
    }

    let audience_engagement = if total_hits == 0 {
        BASE_ENGAGEMENT
    } else {
        (BASE_ENGAGEMENT + ENGAGEMENT_STEP * total_hits as f64).min(MAX_ENGAGEMENT)
    };

    debug!(tone, audience_engagement, "Computed emotional fallback");
    EmotionalAnalysis {
        tone: tone.to_string(),
        audience_engagement,
        emotional_arc: arc,
        source: AnalysisSource::Fallback,
    }
}

/// Regex scene-header extraction heuristic for the technical read.
///
/// Parses `مشهد N - ...` headers, normalizes interior/exterior and
/// day/night markers, and derives the expected-element list from dialogue
/// speaker names (a speaking character the extraction misses is worth a
/// high-severity conflict).
pub fn fallback_technical(text: &str) -> TechnicalAnalysis {
    let mut scene_headers = Vec::new();
    for capture in SCENE_HEADER.captures_iter(text) {
        let rest = capture.get(2).map(|m| m.as_str()).unwrap_or("");
        scene_headers.push(SceneHeader {
            scene_number: capture[1].to_string(),
            int_ext: normalize_int_ext(rest),
            day_night: normalize_day_night(rest),
            location: extract_location(rest),
        });
    }

    let mut expected_elements: Vec<ExpectedElement> = Vec::new();
    for capture in SPEAKER.captures_iter(text) {
        let name = capture[1].trim().to_string();
        if !expected_elements.iter().any(|e| e.label == name) {
            expected_elements.push(ExpectedElement {
                label: name,
                critical: true,
            });
        }
    }

    let is_valid = !scene_headers.is_empty();
    debug!(
        scene_count = scene_headers.len(),
        expected_count = expected_elements.len(),
        is_valid,
        "Computed technical fallback"
    );
    TechnicalAnalysis {
        is_valid,
        scene_headers,
        expected_elements,
        character_consistency: CharacterConsistency::default(),
        source: AnalysisSource::Fallback,
    }
}

fn normalize_int_ext(header: &str) -> String {
    if header.contains("خارجي") || header.contains("خ.") {
        "خارجي".to_string()
    } else {
        // Interior is the safe default for unmarked headers.
        "داخلي".to_string()
    }
}

fn normalize_day_night(header: &str) -> String {
    if header.contains("ليل") || header.contains("مساء") {
        "ليل".to_string()
    } else {
        "نهار".to_string()
    }
}

fn extract_location(header: &str) -> String {
    let location = header
        .split(['-', '–'])
        .map(str::trim)
        .find(|part| {
            !part.is_empty()
                && !part.contains("داخلي")
                && !part.contains("خارجي")
                && !part.contains("ليل")
                && !part.contains("نهار")
                && !part.contains("مساء")
                && !part.contains("صباح")
        })
        .unwrap_or("");
    if location.is_empty() {
        "غير محدد".to_string()
    } else {
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_gets_the_base_engagement() {
        let emotional = fallback_emotional("أحمد يجلس على الكرسي");
        assert_eq!(emotional.tone, "محايد");
        assert_eq!(emotional.audience_engagement, BASE_ENGAGEMENT);
        assert!(emotional.emotional_arc.is_empty());
    }

    #[test]
    fn tense_keywords_raise_engagement() {
        let emotional = fallback_emotional("انفجار ضخم ثم مطاردة وصراخ في الشارع");
        assert_eq!(emotional.tone, "متوتر");
        assert!(emotional.audience_engagement > BASE_ENGAGEMENT);
        assert!(emotional.audience_engagement <= MAX_ENGAGEMENT);
    }

    #[test]
    fn engagement_is_capped() {
        let emotional = fallback_emotional(
            "خوف صراخ انفجار مطاردة تهديد اشتباك حزن بكاء دموع موت فرح سعادة ضحك حب",
        );
        assert_eq!(emotional.audience_engagement, MAX_ENGAGEMENT);
    }

    #[test]
    fn scene_headers_parse_and_normalize() {
        let text = "مشهد 1 - خارجي - نهار - شارع جانبي\nيمشي أحمد مسرعا.\n\nمشهد 2 - داخلي - ليل - شقة ليلى\nليلى: أين كنت؟";
        let technical = fallback_technical(text);

        assert!(technical.is_valid);
        assert_eq!(technical.scene_headers.len(), 2);
        assert_eq!(technical.scene_headers[0].int_ext, "خارجي");
        assert_eq!(technical.scene_headers[0].day_night, "نهار");
        assert_eq!(technical.scene_headers[0].location, "شارع جانبي");
        assert_eq!(technical.scene_headers[1].int_ext, "داخلي");
        assert_eq!(technical.scene_headers[1].day_night, "ليل");
    }

    #[test]
    fn speakers_become_critical_expected_elements() {
        let text = "مشهد 1 - داخلي - نهار - مقهى\nأحمد: صباح الخير.\nليلى: أهلا.\nأحمد: كيف حالك؟";
        let technical = fallback_technical(text);

        assert_eq!(technical.expected_elements.len(), 2);
        assert!(technical.expected_elements.iter().all(|e| e.critical));
        assert!(technical
            .expected_elements
            .iter()
            .any(|e| e.label == "أحمد"));
    }

    #[test]
    fn headerless_text_is_invalid_but_not_an_error() {
        let technical = fallback_technical("نص حر بلا رؤوس مشاهد");
        assert!(!technical.is_valid);
        assert!(technical.scene_headers.is_empty());
    }
}
