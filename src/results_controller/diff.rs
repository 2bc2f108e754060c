//! Snapshot diffing: turns two ordered snapshots into section and object changes.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::{IndexPath, ObjectChange, SectionChange};

/// The identity of one row in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowKey {
    pub key: i64,
    pub version: u64,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Change {
    Section(SectionChange),
    /// `in_old` tells which snapshot holds the object (only deletes use the old one).
    Object {
        key: i64,
        in_old: bool,
        change: ObjectChange,
    },
}

/// Contiguous section ranges. Unsectioned snapshots always have exactly one
/// unnamed section, even when empty.
pub(crate) fn section_ranges(rows: &[RowKey], sectioned: bool) -> Vec<(String, Range<usize>)> {
    if !sectioned {
        return vec![(String::new(), 0..rows.len())];
    }

    let mut sections: Vec<(String, Range<usize>)> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match sections.last_mut() {
            Some((name, range)) if *name == row.section => range.end = index + 1,
            _ => sections.push((row.section.clone(), index..index + 1)),
        }
    }
    sections
}

struct Position {
    flat: usize,
    index_path: IndexPath,
    version: u64,
    section: String,
}

fn positions(rows: &[RowKey], sections: &[(String, Range<usize>)]) -> HashMap<i64, Position> {
    let mut positions = HashMap::with_capacity(rows.len());
    for (section_index, (_, range)) in sections.iter().enumerate() {
        for flat in range.clone() {
            let row = &rows[flat];
            positions.insert(
                row.key,
                Position {
                    flat,
                    index_path: IndexPath::new(section_index, flat - range.start),
                    version: row.version,
                    section: row.section.clone(),
                },
            );
        }
    }
    positions
}

/// Marks the members of one longest strictly increasing subsequence.
fn longest_increasing(sequence: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; sequence.len()];

    for (i, value) in sequence.iter().enumerate() {
        let slot = tails.partition_point(|&t| sequence[t] < *value);
        if slot > 0 {
            previous[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut members = vec![false; sequence.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        members[i] = true;
        cursor = previous[i];
    }
    members
}

/// Changes that turn `old` into `new`, in delivery order: section deletes,
/// object deletes, section inserts, object inserts, moves, updates.
pub(crate) fn diff(old: &[RowKey], new: &[RowKey], sectioned: bool) -> Vec<Change> {
    let old_sections = section_ranges(old, sectioned);
    let new_sections = section_ranges(new, sectioned);
    let old_positions = positions(old, &old_sections);
    let new_positions = positions(new, &new_sections);

    let old_names: HashSet<&str> = old_sections.iter().map(|(n, _)| n.as_str()).collect();
    let new_names: HashSet<&str> = new_sections.iter().map(|(n, _)| n.as_str()).collect();

    let mut changes = Vec::new();

    for (index, (name, _)) in old_sections.iter().enumerate() {
        if !new_names.contains(name.as_str()) {
            changes.push(Change::Section(SectionChange::Delete {
                index,
                name: name.clone(),
            }));
        }
    }

    for row in old {
        if !new_positions.contains_key(&row.key) {
            changes.push(Change::Object {
                key: row.key,
                in_old: true,
                change: ObjectChange::Delete {
                    index_path: old_positions[&row.key].index_path,
                },
            });
        }
    }

    for (index, (name, _)) in new_sections.iter().enumerate() {
        if !old_names.contains(name.as_str()) {
            changes.push(Change::Section(SectionChange::Insert {
                index,
                name: name.clone(),
            }));
        }
    }

    for row in new {
        if !old_positions.contains_key(&row.key) {
            changes.push(Change::Object {
                key: row.key,
                in_old: false,
                change: ObjectChange::Insert {
                    new_index_path: new_positions[&row.key].index_path,
                },
            });
        }
    }

    let common: Vec<i64> = old
        .iter()
        .map(|row| row.key)
        .filter(|key| new_positions.contains_key(key))
        .collect();
    let new_flat: Vec<usize> = common.iter().map(|key| new_positions[key].flat).collect();
    let stable = longest_increasing(&new_flat);

    let mut updates = Vec::new();
    for (i, key) in common.iter().enumerate() {
        let before = &old_positions[key];
        let after = &new_positions[key];

        if !stable[i] || before.section != after.section {
            changes.push(Change::Object {
                key: *key,
                in_old: false,
                change: ObjectChange::Move {
                    from: before.index_path,
                    to: after.index_path,
                },
            });
        } else if before.version != after.version {
            updates.push(Change::Object {
                key: *key,
                in_old: false,
                change: ObjectChange::Update {
                    index_path: after.index_path,
                },
            });
        }
    }
    changes.extend(updates);

    changes
}
