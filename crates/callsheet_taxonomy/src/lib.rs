//! Taxonomy registry and classification engine.
//!
//! This crate turns free screenplay text into evidence-backed, categorized
//! production elements:
//!
//! - [`TaxonomyRegistry`] holds the fixed 21-category rule table, loaded
//!   from bundled TOML defaults or an override file.
//! - [`match_rule`] scores one text fragment against one rule.
//! - [`ClassificationEngine`] runs the matcher over all rules, resolves the
//!   best category, and builds typed [`callsheet_core::ProductionElement`]s.
//! - [`aggregate_sheets`] groups elements into per-category breakdown
//!   sheets with color, priority, and department metadata.
//!
//! The registry is a data table, not branching code: adding a category is a
//! data change plus one enum variant, never new control flow.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod matcher;
mod registry;
mod rule;
mod sheets;

pub use engine::ClassificationEngine;
pub use matcher::{match_rule, RuleMatch};
pub use registry::TaxonomyRegistry;
pub use rule::ClassificationRule;
pub use sheets::{aggregate_sheets, category_color, category_department, category_priority};
