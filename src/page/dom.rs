// src/page/dom.rs
// In-memory model of a roster listing page.
//
// Read contract (what the site gives us):
//
//   <div class="playercard" data-player="4711">
//     <div class="playerhead">Gnash Rambler #7</div>
//     <a class="scoutlink" href="scout.php?player=4711&sport=brutalball">Scout</a>
//     <table class="skilltable">
//       <tr class="skillrow"><td class="skillname">Passing</td>
//           <td width="22"></td><td width="22"></td><td width="22"></td></tr>
//       …
//     </table>
//   </div>
//
// Write contract (what we inject): `<img class="scoutflag" …>` icons inside
// existing cells, and a `<span class="scoutstatus">…</span>` appended to the
// header. Both are recognized again on a later parse, so annotating an
// already-annotated page is stable.
//
// The page is externally owned and gets torn down and rebuilt by the site at
// will, so nothing here holds live references across a re-parse: containers
// are plain data plus byte ranges into this revision's source, and stable
// lookup across revisions goes by player id.

use crate::config::consts::{FLAG_HEIGHT, FLAG_WIDTH};
use crate::core::html::{
    attr_value, inner_after_open_tag, next_nested_block_ci, next_tag_block_ci, open_tag,
    strip_tags, to_lower,
};
use crate::core::sanitize::normalize_entities;

const CONTAINER_OPEN: &str = r#"<div class="playercard""#;
const HEADER_OPEN: &str = r#"<div class="playerhead""#;
const TABLE_OPEN: &str = r#"<table class="skilltable""#;
const STATUS_OPEN: &str = r#"<span class="scoutstatus""#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagColor {
    Green,
    Yellow,
    Red,
}

impl FlagColor {
    fn name(self) -> &'static str {
        match self {
            FlagColor::Green => "green",
            FlagColor::Yellow => "yellow",
            FlagColor::Red => "red",
        }
    }

    pub fn img_tag(self) -> String {
        format!(
            r#"<img class="scoutflag" src="img/flag_{}.gif" width="{}" height="{}">"#,
            self.name(),
            FLAG_WIDTH,
            FLAG_HEIGHT
        )
    }

    fn from_img(tag: &str) -> Option<Self> {
        let lc = to_lower(tag);
        if lc.contains("flag_green") {
            Some(FlagColor::Green)
        } else if lc.contains("flag_yellow") {
            Some(FlagColor::Yellow)
        } else if lc.contains("flag_red") {
            Some(FlagColor::Red)
        } else {
            None
        }
    }
}

/// One cell after the skill-name cell. `raw` is the cell's inner HTML with
/// any previously injected flag icons stripped back out.
#[derive(Clone, Debug)]
pub struct SkillCell {
    pub width: Option<u32>,
    pub flag: Option<FlagColor>,
    raw: String,
    inner: (usize, usize),
}

#[derive(Clone, Debug)]
pub struct SkillRow {
    pub name: String,
    pub cells: Vec<SkillCell>,
}

/// Plain-data view of one player card. `node` is (page revision, index) and
/// stands in for DOM node identity: a re-parsed page yields fresh nodes even
/// for the same logical player.
#[derive(Clone, Debug)]
pub struct PlayerContainer {
    pub node: (u64, usize),
    pub player_id: u32,
    pub has_scout_link: bool,
    pub has_skill_table: bool,
    pub rows: Vec<SkillRow>,
    pub status: Option<String>,
    status_range: Option<(usize, usize)>,
    head_insert: Option<usize>,
}

pub struct RosterPage {
    revision: u64,
    source: String,
    containers: Vec<PlayerContainer>,
}

impl RosterPage {
    /// Discover player containers in the page source. A container without a
    /// parseable player id is logged and skipped.
    pub fn parse(html: &str, revision: u64) -> Self {
        let mut containers = Vec::new();
        for (start, end) in container_blocks(html) {
            let index = containers.len();
            match parse_container(html, start, end, (revision, index)) {
                Some(c) => containers.push(c),
                None => logd!("playercard at byte {} has no usable player id, skipping", start),
            }
        }
        Self { revision, source: html.to_string(), containers }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn containers(&self) -> &[PlayerContainer] {
        &self.containers
    }

    pub fn containers_mut(&mut self) -> &mut [PlayerContainer] {
        &mut self.containers
    }

    /// Re-serialize the page: original source with cell contents and status
    /// spans spliced in. Untouched markup passes through byte for byte.
    pub fn render(&self) -> String {
        let mut edits: Vec<(usize, usize, String)> = Vec::new();

        for c in &self.containers {
            for row in &c.rows {
                for cell in &row.cells {
                    let mut content = cell.raw.clone();
                    if let Some(flag) = cell.flag {
                        content.push_str(&flag.img_tag());
                    }
                    edits.push((cell.inner.0, cell.inner.1, content));
                }
            }
            match (&c.status, c.status_range, c.head_insert) {
                (Some(text), Some((s, e)), _) => edits.push((s, e, status_span(text))),
                (Some(text), None, Some(at)) => edits.push((at, at, status_span(text))),
                (None, Some((s, e)), _) => edits.push((s, e, s!())),
                _ => {}
            }
        }

        // Back to front so earlier ranges stay valid.
        edits.sort_by(|a, b| b.0.cmp(&a.0));
        let mut out = self.source.clone();
        for (s, e, replacement) in edits {
            out.replace_range(s..e, &replacement);
        }
        out
    }
}

fn status_span(text: &str) -> String {
    format!(r#"<span class="scoutstatus">{}</span>"#, text)
}

fn container_blocks(src: &str) -> Vec<(usize, usize)> {
    let lc = to_lower(src);
    let open = to_lower(CONTAINER_OPEN);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel) = lc.get(pos..).and_then(|t| t.find(&open)) {
        let start = pos + rel;
        match next_nested_block_ci(src, "<div", "</div>", start) {
            Some((s, e)) => {
                out.push((s, e));
                pos = e;
            }
            None => break,
        }
    }
    out
}

fn parse_container(
    src: &str,
    start: usize,
    end: usize,
    node: (u64, usize),
) -> Option<PlayerContainer> {
    let block = &src[start..end];
    let player_id: u32 = attr_value(open_tag(block), "data-player")?.trim().parse().ok()?;

    let has_scout_link = to_lower(block).contains(r#"class="scoutlink""#);

    // Header: where the status span lives (or gets inserted, just before the
    // header's closing tag).
    let mut status = None;
    let mut status_range = None;
    let mut head_insert = None;
    if let Some(head_rel) = to_lower(block).find(&to_lower(HEADER_OPEN)) {
        if let Some((hs, he)) = next_nested_block_ci(block, "<div", "</div>", head_rel) {
            head_insert = Some(start + he - "</div>".len());
            let head = &block[hs..he];
            if let Some((ss, se)) = next_tag_block_ci(head, STATUS_OPEN, "</span>", 0) {
                status = Some(strip_tags(normalize_entities(&inner_after_open_tag(
                    &head[ss..se],
                ))));
                status_range = Some((start + hs + ss, start + hs + se));
            }
        }
    }

    let mut has_skill_table = false;
    let mut rows = Vec::new();
    if let Some((ts, te)) = next_tag_block_ci(block, TABLE_OPEN, "</table>", 0) {
        has_skill_table = true;
        let table = &block[ts..te];
        let mut pos = 0usize;
        while let Some((rs, re)) = next_tag_block_ci(table, "<tr", "</tr>", pos) {
            let tr = &table[rs..re];
            pos = re;
            if !to_lower(open_tag(tr)).contains("skillrow") {
                continue;
            }
            if let Some(row) = parse_row(tr, start + ts + rs) {
                rows.push(row);
            }
        }
    }

    Some(PlayerContainer {
        node,
        player_id,
        has_scout_link,
        has_skill_table,
        rows,
        status,
        status_range,
        head_insert,
    })
}

/// First cell is the skill name; the rest are flag candidates.
fn parse_row(tr: &str, tr_abs: usize) -> Option<SkillRow> {
    let mut name = None;
    let mut cells = Vec::new();
    let mut pos = 0usize;
    while let Some((ds, de)) = next_tag_block_ci(tr, "<td", "</td>", pos) {
        let td = &tr[ds..de];
        pos = de;
        let inner = inner_after_open_tag(td);
        if name.is_none() {
            name = Some(strip_tags(normalize_entities(&inner)));
            continue;
        }
        let open = open_tag(td);
        let width = attr_value(open, "width").and_then(|w| w.trim().parse().ok());
        let inner_start = tr_abs + ds + open.len();
        let inner_end = tr_abs + de - "</td>".len();
        let (raw, flag) = strip_flags(&inner);
        cells.push(SkillCell { width, flag, raw, inner: (inner_start, inner_end) });
    }
    name.map(|name| SkillRow { name, cells })
}

/// Remove previously injected flag icons from cell HTML; report the first
/// flag color found so a rendered page re-parses to the same model.
fn strip_flags(inner: &str) -> (String, Option<FlagColor>) {
    let lc = to_lower(inner);
    let mut out = String::with_capacity(inner.len());
    let mut flag = None;
    let mut pos = 0usize;
    while let Some(rel) = lc.get(pos..).and_then(|t| t.find("<img")) {
        let img_start = pos + rel;
        let img_end = match inner[img_start..].find('>') {
            Some(i) => img_start + i + 1,
            None => inner.len(),
        };
        let tag = &inner[img_start..img_end];
        if to_lower(tag).contains("scoutflag") {
            out.push_str(&inner[pos..img_start]);
            if flag.is_none() {
                flag = FlagColor::from_img(tag);
            }
        } else {
            out.push_str(&inner[pos..img_end]);
        }
        pos = img_end;
    }
    out.push_str(&inner[pos..]);
    (out, flag)
}
