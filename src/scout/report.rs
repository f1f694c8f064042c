// src/scout/report.rs
// Scout report fragment -> structured record.
//
// The report is a small HTML fragment with one definition block per rating:
//
//   <dl class="scoutblock">
//     <dt>Highest potential</dt>
//     <dd>
//       <ul><li>Passing</li><li>Potential</li></ul>
//       <div class="stars"><i class="star on"></i><i class="star off"></i>…</div>
//     </dd>
//   </dl>
//
// Parsing is total: malformed or partial fragments just leave fields at
// their defaults.

use serde::{Deserialize, Serialize};

use crate::core::html::{
    inner_after_open_tag, next_nested_block_ci, next_tag_block_ci, slice_between_ci, strip_tags,
    to_lower,
};
use crate::core::sanitize::normalize_entities;

/// Generic non-skill entries the report mixes into its lists.
const SKIP_ENTRIES: &[&str] = &["potential", "youth training speed"];

const MAX_STARS: u8 = 4;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutRecord {
    pub highest: Vec<String>,
    pub lowest: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars_high: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars_low: Option<u8>,
}

impl ScoutRecord {
    /// Both lists empty means the report carried nothing usable.
    pub fn is_empty(&self) -> bool {
        self.highest.is_empty() && self.lowest.is_empty()
    }
}

/// Parse a scout report fragment. Never fails; unrecognized or missing
/// pieces leave the corresponding fields empty/absent.
pub fn parse(fragment: &str) -> ScoutRecord {
    let mut rec = ScoutRecord::default();
    let mut have_high = false;
    let mut have_low = false;

    let mut pos = 0usize;
    while let Some((s, e)) = next_nested_block_ci(fragment, "<dl", "</dl>", pos) {
        let block = &fragment[s..e];
        pos = e;

        let heading = match next_tag_block_ci(block, "<dt", "</dt>", 0) {
            Some((hs, he)) => to_lower(&strip_tags(normalize_entities(
                &inner_after_open_tag(&block[hs..he]),
            ))),
            None => continue,
        };

        // First matching block of each kind wins; others are ignored.
        if heading.contains("highest") && !have_high {
            have_high = true;
            rec.highest = read_skills(block);
            rec.stars_high = read_stars(block);
        } else if heading.contains("lowest") && !have_low {
            have_low = true;
            rec.lowest = read_skills(block);
            rec.stars_low = read_stars(block);
        }
    }
    rec
}

fn read_skills(block: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((s, e)) = next_tag_block_ci(block, "<li", "</li>", pos) {
        let text = strip_tags(normalize_entities(&inner_after_open_tag(&block[s..e])));
        pos = e;
        if text.is_empty() {
            continue;
        }
        let lc = to_lower(&text);
        if SKIP_ENTRIES.contains(&lc.as_str()) {
            continue;
        }
        out.push(text);
    }
    out
}

/// Count lit stars in the block's star widget, if it has one.
fn read_stars(block: &str) -> Option<u8> {
    let widget = slice_between_ci(block, r#"<div class="stars""#, "</div>")?;
    let lit = to_lower(widget).matches("star on").count();
    Some((lit as u8).min(MAX_STARS))
}
