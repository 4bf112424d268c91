//! Derived views over the in-memory record list: search filtering,
//! grouping by building, and the distinct building list.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::types::directory::{PhoneEntry, UNSPECIFIED_BUILDING};

/// Entries sharing one building label, in list order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryGroup<'a> {
    pub building: String,
    pub entries: Vec<&'a PhoneEntry>,
}

/// Returns `true` if `entry` matches `term`.
///
/// Department and building are compared case-insensitively. The number is
/// searched as stored, against the lowercased term. An empty term matches
/// everything.
pub fn matches_term(entry: &PhoneEntry, term: &str) -> bool {
    let needle = term.to_lowercase();
    entry.department.to_lowercase().contains(&needle)
        || entry.number.contains(&needle)
        || entry.building.to_lowercase().contains(&needle)
}

/// Entries matching `term`, preserving list order.
pub fn filter_entries<'a>(entries: &'a [PhoneEntry], term: &str) -> Vec<&'a PhoneEntry> {
    entries.iter().filter(|e| matches_term(e, term)).collect()
}

/// Partitions `entries` by building label.
///
/// Groups appear in first-seen order; entries keep their relative order.
pub fn group_by_building<'a>(entries: &[&'a PhoneEntry]) -> Vec<EntryGroup<'a>> {
    let mut groups: Vec<EntryGroup<'a>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for &entry in entries {
        let label = entry.building_label();
        match positions.get(label) {
            Some(&pos) => groups[pos].entries.push(entry),
            None => {
                positions.insert(label, groups.len());
                groups.push(EntryGroup {
                    building: label.to_string(),
                    entries: vec![entry],
                });
            }
        }
    }

    groups
}

/// Sorted, de-duplicated building labels across all `entries`.
pub fn distinct_buildings(entries: &[PhoneEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            if e.building.is_empty() {
                UNSPECIFIED_BUILDING.to_string()
            } else {
                e.building.clone()
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
