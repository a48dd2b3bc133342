use callsheet_core::CategoryFamily;
use callsheet_taxonomy::{aggregate_sheets, ClassificationEngine, TaxonomyRegistry};

fn engine() -> ClassificationEngine {
    ClassificationEngine::new(TaxonomyRegistry::bundled().unwrap())
}

#[test]
fn handheld_prop_is_extracted_with_evidence() {
    let text = "أحمد يحمل كوب قهوة.";
    let elements = engine().classify_multiple(text, "scene-1");

    let prop = elements
        .iter()
        .find(|e| e.category.family() == CategoryFamily::HandheldItems)
        .expect("expected a handheld-family element");

    assert!(
        prop.evidence.text_excerpt.contains("كوب") || prop.evidence.text_excerpt.contains("قهوة")
    );
    assert!(prop.evidence.rationale.contains("props"));
}

#[test]
fn spans_are_valid_for_the_source_text() {
    let text = "أحمد يحمل كوب قهوة. ليلى ترتدي فستان أحمر.\nسيارة قديمة أمام الفيلا.";
    for element in engine().classify_multiple(text, "scene-1") {
        assert!(element.evidence.span_start < element.evidence.span_end);
        assert!(element.evidence.span_end <= text.len());
        assert_eq!(
            &text[element.evidence.span_start..element.evidence.span_end],
            element.evidence.text_excerpt
        );
    }
}

#[test]
fn confidence_is_bounded_and_mirrors_evidence() {
    let text = "أحمد يحمل كوب قهوة. انفجار ضخم في الشارع.";
    for element in engine().classify_multiple(text, "scene-1") {
        assert!((0.0..=1.0).contains(&element.confidence));
        assert_eq!(element.confidence, element.evidence.confidence);
    }
}

#[test]
fn duplicate_names_in_one_category_keep_first_occurrence() {
    // Two sentences that both classify as props with the same excerpt.
    let text = "أحمد يحمل كوب قهوة. ليلى تمسك كوب قهوة أيضا.";
    let elements = engine().classify_multiple(text, "scene-1");

    let props: Vec<_> = elements
        .iter()
        .filter(|e| e.name.to_lowercase() == "كوب")
        .collect();
    assert_eq!(props.len(), 1);
    // First occurrence wins: the span must sit in the first sentence.
    assert!(props[0].evidence.span_start < text.find('.').unwrap());
}

#[test]
fn element_ids_are_unique_per_scene_category_ordinal() {
    let text = "أحمد يحمل كوب قهوة. ليلى تمسك هاتف قديم.";
    let elements = engine().classify_multiple(text, "scene-3");
    let mut ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), elements.len());
    assert!(elements.iter().all(|e| e.id.starts_with("scene-3-")));
}

#[test]
fn classified_elements_partition_into_sheets() {
    let text = "أحمد يحمل كوب قهوة. ليلى ترتدي فستان أحمر. سيارة قديمة أمام المقهى. ضجيج مرتفع في الخارج.";
    let elements = engine().classify_multiple(text, "scene-1");
    assert!(!elements.is_empty());

    let sheets = aggregate_sheets(&elements);
    let total: usize = sheets.iter().map(|s| s.total_count).sum();
    assert_eq!(total, elements.len());
    for sheet in &sheets {
        assert!(sheet.items.iter().all(|i| i.category == sheet.category));
        assert!(sheet.color_code.starts_with('#'));
        assert!(!sheet.department.is_empty());
    }
}

#[test]
fn empty_script_yields_nothing() {
    let elements = engine().classify_multiple("", "scene-1");
    assert!(elements.is_empty());
    assert!(aggregate_sheets(&elements).is_empty());
}
