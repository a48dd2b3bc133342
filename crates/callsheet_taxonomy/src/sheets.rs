//! Grouping elements into per-category breakdown sheets.

use callsheet_core::{BreakdownSheet, Category, PriorityLevel, ProductionElement};
use strum::IntoEnumIterator;
use tracing::debug;

/// Sheet color for categories without an explicit palette entry.
const DEFAULT_COLOR: &str = "#CCCCCC";

/// Sheet color for a category, from the standard breakdown palette.
pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Cast => "#FF6B6B",
        Category::Extras => "#4ECDC4",
        Category::Stunts => "#FF8B94",
        Category::Security => "#FBE7C6",
        Category::AdditionalLabor => "#A0E7E5",
        Category::Props => "#95E1D3",
        Category::Wardrobe => "#AA96DA",
        Category::Makeup => "#FCBAD3",
        Category::SetDressing => "#FFAEBC",
        Category::Greenery => "#B4F8C8",
        Category::Vehicles => "#F38181",
        Category::Animals => "#C7CEEA",
        Category::Location => "#FFD3B6",
        Category::SpecialEquipment => "#B4F8C8",
        Category::SpecialEffects => "#FFFFD2",
        Category::Sound => "#A8D8EA",
        Category::Music => "#FFCCCC",
        // No palette entry in the standard sheet layout.
        Category::FoodStyling
        | Category::VisualEffects
        | Category::MechanicalEffects
        | Category::CameraLighting => DEFAULT_COLOR,
    }
}

/// Production priority for a category's sheet.
///
/// Long-lead and safety-critical departments rank high, standard prep
/// departments medium, notes-level departments low.
pub fn category_priority(category: Category) -> PriorityLevel {
    match category {
        Category::Cast
        | Category::Vehicles
        | Category::Stunts
        | Category::SpecialEffects => PriorityLevel::High,
        Category::Props | Category::Wardrobe | Category::SetDressing => PriorityLevel::Medium,
        _ => PriorityLevel::Low,
    }
}

/// Department a category's sheet is handed to.
pub fn category_department(category: Category) -> &'static str {
    match category {
        Category::Cast => "casting",
        Category::Extras => "production",
        Category::Stunts => "stunts",
        Category::Security => "production",
        Category::AdditionalLabor => "production",
        Category::Props => "props",
        Category::Wardrobe => "costume",
        Category::Makeup => "makeup_hair",
        Category::FoodStyling => "props",
        Category::SetDressing => "art",
        Category::Greenery => "art",
        Category::Vehicles => "transport",
        Category::Animals => "animal_wrangling",
        Category::Location => "locations",
        Category::SpecialEquipment => "grip",
        Category::SpecialEffects => "sfx",
        Category::VisualEffects => "vfx",
        Category::MechanicalEffects => "sfx",
        Category::Sound => "sound",
        Category::Music => "music",
        Category::CameraLighting => "camera",
    }
}

/// Group elements into breakdown sheets, one per populated category.
///
/// Every element lands on exactly one sheet, so the sheet counts always sum
/// to the element count. Sheets come back sorted by priority (high first),
/// stable on ties by category declaration order.
///
/// # Examples
///
/// ```
/// use callsheet_taxonomy::{aggregate_sheets, ClassificationEngine, TaxonomyRegistry};
///
/// let engine = ClassificationEngine::new(TaxonomyRegistry::bundled().unwrap());
/// let elements = engine.classify_multiple("أحمد يحمل كوب قهوة.", "scene-1");
/// let sheets = aggregate_sheets(&elements);
/// let total: usize = sheets.iter().map(|s| s.total_count).sum();
/// assert_eq!(total, elements.len());
/// ```
pub fn aggregate_sheets(elements: &[ProductionElement]) -> Vec<BreakdownSheet> {
    let mut sheets: Vec<BreakdownSheet> = Category::iter()
        .filter_map(|category| {
            let items: Vec<ProductionElement> = elements
                .iter()
                .filter(|e| e.category == category)
                .cloned()
                .collect();
            if items.is_empty() {
                return None;
            }
            let total_count = items.len();
            Some(BreakdownSheet {
                category,
                category_name: category.display_name().to_string(),
                color_code: category_color(category).to_string(),
                items,
                total_count,
                priority_level: category_priority(category),
                department: category_department(category).to_string(),
            })
        })
        .collect();

    // Declaration order is the tie-break; a stable sort preserves it.
    sheets.sort_by_key(|s| s.priority_level);
    debug!(sheet_count = sheets.len(), "Aggregated breakdown sheets");
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsheet_core::{ElementContext, Evidence, Provenance};
    use std::collections::BTreeSet;

    fn element(category: Category, name: &str, confidence: f64) -> ProductionElement {
        ProductionElement {
            id: format!("scene-1-{category}-001"),
            category,
            name: name.to_string(),
            description: format!("{}: {name}", category.display_name()),
            scene_id: "scene-1".to_string(),
            evidence: Evidence {
                span_start: 0,
                span_end: name.len().max(1),
                text_excerpt: name.to_string(),
                rationale: "test".to_string(),
                confidence,
            },
            confidence,
            extracted_by: Provenance::rule_based(),
            context: ElementContext::default(),
            dependencies: BTreeSet::new(),
        }
    }

    #[test]
    fn every_element_lands_on_exactly_one_sheet() {
        let elements = vec![
            element(Category::Props, "كوب", 0.6),
            element(Category::Props, "هاتف", 0.5),
            element(Category::Cast, "أحمد", 0.8),
            element(Category::Sound, "ضجيج", 0.4),
        ];
        let sheets = aggregate_sheets(&elements);
        let total: usize = sheets.iter().map(|s| s.total_count).sum();
        assert_eq!(total, elements.len());
        for sheet in &sheets {
            assert_eq!(sheet.total_count, sheet.items.len());
            for item in &sheet.items {
                assert_eq!(item.category, sheet.category);
            }
        }
    }

    #[test]
    fn sheets_sort_high_priority_first() {
        let elements = vec![
            element(Category::Sound, "ضجيج", 0.4),
            element(Category::Props, "كوب", 0.6),
            element(Category::Cast, "أحمد", 0.8),
        ];
        let priorities: Vec<PriorityLevel> = aggregate_sheets(&elements)
            .iter()
            .map(|s| s.priority_level)
            .collect();
        assert_eq!(
            priorities,
            vec![PriorityLevel::High, PriorityLevel::Medium, PriorityLevel::Low]
        );
    }

    #[test]
    fn equal_priority_ties_keep_declaration_order() {
        let elements = vec![
            element(Category::Wardrobe, "فستان", 0.5),
            element(Category::Props, "كوب", 0.6),
        ];
        let categories: Vec<Category> = aggregate_sheets(&elements)
            .iter()
            .map(|s| s.category)
            .collect();
        // Props is declared before Wardrobe; both are Medium.
        assert_eq!(categories, vec![Category::Props, Category::Wardrobe]);
    }

    #[test]
    fn no_elements_means_no_sheets() {
        assert!(aggregate_sheets(&[]).is_empty());
    }

    #[test]
    fn unlisted_categories_get_the_neutral_color() {
        assert_eq!(category_color(Category::VisualEffects), "#CCCCCC");
        assert_eq!(category_color(Category::Cast), "#FF6B6B");
    }
}
