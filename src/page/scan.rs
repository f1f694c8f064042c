// src/page/scan.rs
// Container scanner: discovers player cards, paces scout fetches, tracks
// per-container outcome as a status string, and repaints flags from memory
// when the site rebuilds its DOM.

use std::collections::{HashMap, HashSet};
use std::thread;
use std::time::Duration;

use crate::config::consts::FETCH_STAGGER_MS;
use crate::page::dom::RosterPage;
use crate::page::flags::apply_flags;
use crate::progress::Progress;
use crate::scout::fetch::ScoutSource;
use crate::scout::report::ScoutRecord;

pub const STATUS_FETCHING: &str = "Fetching scout…";
pub const STATUS_FLAGS_ADDED: &str = "Scout flags added";
pub const STATUS_NO_INFO: &str = "No scout info";
pub const STATUS_NO_LINK: &str = "No scout link";
pub const STATUS_NO_TABLE: &str = "No skills table";

/// Per-run coordinator. One instance per page session; the result map and
/// the seen-node set are explicit state so tests can drive it with fake
/// pages and scripted scout sources.
pub struct Annotator {
    /// Player id -> last fetched record. Repaints never refetch.
    processed: HashMap<u32, ScoutRecord>,
    /// Nodes already scheduled, so repeated change events don't double-fetch.
    /// Purely a marker: every state is re-derivable by reprocessing.
    seen: HashSet<(u64, usize)>,
    stagger: Duration,
}

impl Annotator {
    pub fn new() -> Self {
        Self::with_stagger(Duration::from_millis(FETCH_STAGGER_MS))
    }

    pub fn with_stagger(stagger: Duration) -> Self {
        Self { processed: HashMap::new(), seen: HashSet::new(), stagger }
    }

    pub fn processed(&self) -> &HashMap<u32, ScoutRecord> {
        &self.processed
    }

    /// Process every container not yet seen. Network requests are spaced
    /// `stagger` apart; one container's failure never touches the others.
    pub fn scan(
        &mut self,
        page: &mut RosterPage,
        source: &mut dyn ScoutSource,
        mut progress: Option<&mut dyn Progress>,
    ) {
        let total = page.containers().len();
        if let Some(p) = progress.as_deref_mut() {
            p.begin(total);
        }

        let mut fetched = 0usize;
        for i in 0..total {
            let (node, player_id, has_link, has_table) = {
                let c = &page.containers()[i];
                (c.node, c.player_id, c.has_scout_link, c.has_skill_table)
            };
            if !self.seen.insert(node) {
                continue;
            }

            // Recreated node for a player we already fetched: repaint from
            // memory, no network.
            if let Some(record) = self.processed.get(&player_id).cloned() {
                self.finish_container(page, i, &record);
                report(&mut progress, player_id, "repainted from memory");
                continue;
            }

            if !has_link {
                set_status(page, i, STATUS_NO_LINK);
                report(&mut progress, player_id, STATUS_NO_LINK);
                continue;
            }
            if !has_table {
                set_status(page, i, STATUS_NO_TABLE);
                report(&mut progress, player_id, STATUS_NO_TABLE);
                continue;
            }

            set_status(page, i, STATUS_FETCHING);
            if fetched > 0 {
                thread::sleep(self.stagger); // be polite
            }
            fetched += 1;

            match source.fetch(player_id) {
                Ok(record) => {
                    self.processed.insert(player_id, record.clone());
                    self.finish_container(page, i, &record);
                    let c = &page.containers()[i];
                    report(&mut progress, player_id, c.status.as_deref().unwrap_or(""));
                }
                Err(e) => {
                    loge!("scout {}: {}", player_id, e);
                    set_status(page, i, &format!("Scout error: {}", e));
                    report(&mut progress, player_id, &format!("Scout error: {}", e));
                }
            }
        }

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
    }

    /// Repaint stored results onto every present container whose player id
    /// has a record. Needed after the site destroys and recreates nodes:
    /// fresh nodes come back without their injected flags.
    pub fn reapply(&self, page: &mut RosterPage) {
        for i in 0..page.containers().len() {
            let player_id = page.containers()[i].player_id;
            if let Some(record) = self.processed.get(&player_id).cloned() {
                self.finish_container(page, i, &record);
            }
        }
    }

    fn finish_container(&self, page: &mut RosterPage, i: usize, record: &ScoutRecord) {
        if record.is_empty() {
            set_status(page, i, STATUS_NO_INFO);
            return;
        }
        apply_flags(&mut page.containers_mut()[i].rows, record);
        set_status(page, i, STATUS_FLAGS_ADDED);
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

fn set_status(page: &mut RosterPage, i: usize, text: &str) {
    page.containers_mut()[i].status = Some(s!(text));
}

fn report(progress: &mut Option<&mut dyn Progress>, player_id: u32, msg: &str) {
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("player {}: {}", player_id, msg));
        p.item_done(player_id);
    }
}
