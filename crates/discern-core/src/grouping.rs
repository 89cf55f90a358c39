//! Variant grouping.
//!
//! Catalogs list the same release several times: the original, a remaster,
//! a deluxe edition, a regional reissue. Grouping clusters those editions
//! under one header so a result list shows each release once.

use std::collections::HashMap;

use crate::keywords::GROUPING_NOISE;
use crate::model::{ScoredResult, VariantGroup};

/// Reduce a title to the part shared by all of its editions.
///
/// Lowercases, removes `(...)` and `[...]` segments, drops edition noise
/// words, and keeps only alphanumeric characters.
pub fn normalize_title_for_grouping(title: &str) -> String {
    let mut stripped = String::with_capacity(title.len());
    let mut depth = 0usize;
    for c in title.to_lowercase().chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    let mut cleaned = stripped;
    for noise in GROUPING_NOISE {
        cleaned = cleaned.replace(noise, "");
    }

    cleaned.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn grouping_key(result: &ScoredResult) -> String {
    format!(
        "{}|{}",
        result.artist.to_lowercase(),
        normalize_title_for_grouping(&result.title)
    )
}

/// Cluster results into variant groups, preserving first-seen group order.
pub fn group_variants(results: Vec<ScoredResult>) -> Vec<VariantGroup> {
    let mut groups: Vec<VariantGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let key = grouping_key(&result);
        match index.get(&key) {
            Some(&slot) => groups[slot].absorb(result),
            None => {
                index.insert(key, groups.len());
                groups.push(VariantGroup::seed(result));
            }
        }
    }

    for group in &mut groups {
        if group.has_multiple() {
            group.sort_variants_by_title_length();
        }
    }

    log::debug!("Grouped into {} variant groups", groups.len());
    groups
}
