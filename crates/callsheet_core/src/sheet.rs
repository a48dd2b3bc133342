//! Breakdown sheets: per-category element groupings for department handoff.

use crate::{Category, ProductionElement};
use serde::{Deserialize, Serialize};

/// Production priority of a breakdown sheet.
///
/// Declaration order is the sort order: `High` sorts before `Medium`
/// sorts before `Low`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PriorityLevel {
    /// Long-lead or safety-critical departments
    High,
    /// Standard prep departments
    Medium,
    /// Notes-level departments
    Low,
}

/// A per-category grouping of elements prepared for department handoff.
///
/// Derived data: recomputed whenever the element set changes, never
/// persisted independently of its source elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSheet {
    /// Taxonomy category of every item on this sheet
    pub category: Category,
    /// Display name for the category
    pub category_name: String,
    /// Sheet color, `#RRGGBB`
    pub color_code: String,
    /// Elements on this sheet, in extraction order
    pub items: Vec<ProductionElement>,
    /// Number of items; always `items.len()`
    pub total_count: usize,
    /// Production priority of the owning department
    pub priority_level: PriorityLevel,
    /// Department the sheet is handed to
    pub department: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_sorts_high_first() {
        let mut levels = vec![PriorityLevel::Low, PriorityLevel::High, PriorityLevel::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![PriorityLevel::High, PriorityLevel::Medium, PriorityLevel::Low]
        );
    }
}
