//! Semantic checks on an ingestion document not expressible via JSON Schema.

use std::collections::HashSet;

use crate::affordance::{Affordance, Category, WireAffordances};

/// Check that every property `Category` is 0, 1 or 2.
///
/// Category alone decides which directions are populated, so names (empty or
/// not) are never checked here.
pub fn validate_invariants(doc: &WireAffordances) -> Vec<String> {
    doc.props
        .iter()
        .enumerate()
        .filter(|(_, prop)| Category::from_code(prop.category).is_none())
        .map(|(index, prop)| {
            format!(
                "Props[{}]: Category {} is not one of 0, 1, 2",
                index, prop.category
            )
        })
        .collect()
}

/// Names that appear more than once within one sequence. Such entries collapse
/// into a single key of the produced document.
pub fn duplicate_names(doc: &WireAffordances) -> Vec<String> {
    let mut duplicates = Vec::new();
    collect_duplicates("Props", doc.props.iter().map(|p| p.name.as_str()), &mut duplicates);
    collect_duplicates("Actions", names(&doc.actions), &mut duplicates);
    collect_duplicates("Events", names(&doc.events), &mut duplicates);
    duplicates
}

fn names(affordances: &[Affordance]) -> impl Iterator<Item = &str> {
    affordances.iter().map(|a| a.name.as_str())
}

fn collect_duplicates<'a>(
    section: &str,
    names: impl Iterator<Item = &'a str>,
    out: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            out.push(format!("{}: duplicate name '{}'", section, name));
        }
    }
}
