// src/page/flags.rs
// Star counts -> flag placement on skill rows.

use std::collections::HashMap;

use crate::config::consts::{FLAG_CELLS, FLAG_CELL_MAX_WIDTH};
use crate::page::dom::{FlagColor, SkillRow};
use crate::scout::report::ScoutRecord;
use crate::skills::normalize;

/// Only the top two rating tiers are notable on the high side:
/// 4 stars -> 3 green flags, 3 -> 2, 2 -> 1, anything else -> none.
pub fn high_flag_count(stars: Option<u8>) -> usize {
    match stars {
        Some(4) => 3,
        Some(3) => 2,
        Some(2) => 1,
        _ => 0,
    }
}

/// Low side gets a single warning flag: 2 stars yellow, 1 star red.
pub fn low_flag(stars: Option<u8>) -> Option<FlagColor> {
    match stars {
        Some(2) => Some(FlagColor::Yellow),
        Some(1) => Some(FlagColor::Red),
        _ => None,
    }
}

/// Paint a record's flags onto the skill rows. Idempotent: every touched
/// row's flag cells are cleared before anything is set. The low pass runs
/// after the high pass, so a skill named in both lists ends up with its low
/// flag (last writer wins).
pub fn apply_flags(rows: &mut [SkillRow], record: &ScoutRecord) {
    let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        lookup.entry(normalize(&row.name)).or_default().push(i);
    }

    let high = high_flag_count(record.stars_high);
    if high > 0 {
        for skill in &record.highest {
            for &i in lookup.get(&normalize(skill)).into_iter().flatten() {
                paint(&mut rows[i], high, FlagColor::Green);
            }
        }
    }

    if let Some(color) = low_flag(record.stars_low) {
        for skill in &record.lowest {
            for &i in lookup.get(&normalize(skill)).into_iter().flatten() {
                paint(&mut rows[i], 1, color);
            }
        }
    }
}

fn paint(row: &mut SkillRow, count: usize, color: FlagColor) {
    let eligible = eligible_cells(row);
    for &i in &eligible {
        row.cells[i].flag = None;
    }
    // Fewer eligible cells than flags just truncates.
    for &i in eligible.iter().take(count) {
        row.cells[i].flag = Some(color);
    }
}

/// The first three cells after the skill name are flag-eligible. A short
/// row (responsive layout drops cells) falls back to whatever cells carry a
/// narrow width attribute.
fn eligible_cells(row: &SkillRow) -> Vec<usize> {
    if row.cells.len() >= FLAG_CELLS {
        (0..FLAG_CELLS).collect()
    } else {
        row.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.width.is_some_and(|w| w <= FLAG_CELL_MAX_WIDTH))
            .map(|(i, _)| i)
            .take(FLAG_CELLS)
            .collect()
    }
}
