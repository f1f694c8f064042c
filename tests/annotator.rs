// tests/annotator.rs
//
// Scanner/observer behavior against fake pages and a scripted scout source.

use std::collections::HashMap;
use std::time::Duration;

use bb_scout::page::dom::RosterPage;
use bb_scout::page::scan::{
    Annotator, STATUS_FETCHING, STATUS_FLAGS_ADDED, STATUS_NO_INFO, STATUS_NO_LINK,
    STATUS_NO_TABLE,
};
use bb_scout::page::watch::{self, ChangeFeed, PageChange};
use bb_scout::progress::Progress;
use bb_scout::scout::fetch::{FetchError, ScoutSource};
use bb_scout::scout::report::ScoutRecord;

fn skill_row(name: &str) -> String {
    format!(
        r#"<tr class="skillrow"><td class="skillname">{}</td><td width="22"></td><td width="22"></td><td width="22"></td></tr>"#,
        name
    )
}

fn container(player_id: u32, with_link: bool, with_table: bool, skills: &[&str]) -> String {
    let link = if with_link {
        format!(r#"<a class="scoutlink" href="scout.php?player={}&sport=brutalball">Scout</a>"#, player_id)
    } else {
        String::new()
    };
    let table = if with_table {
        let rows: String = skills.iter().map(|s| skill_row(s)).collect();
        format!(r#"<table class="skilltable">{}</table>"#, rows)
    } else {
        String::new()
    };
    format!(
        r#"<div class="playercard" data-player="{id}"><div class="playerhead">Player {id}</div>{link}{table}</div>"#,
        id = player_id,
        link = link,
        table = table
    )
}

fn record(high: &[&str], sh: Option<u8>) -> ScoutRecord {
    ScoutRecord {
        highest: high.iter().map(|s| s.to_string()).collect(),
        lowest: vec![],
        stars_high: sh,
        stars_low: None,
    }
}

/// Scripted source: canned results plus a per-player call counter.
#[derive(Default)]
struct FakeSource {
    results: HashMap<u32, Result<ScoutRecord, u16>>,
    calls: HashMap<u32, usize>,
}

impl FakeSource {
    fn with(mut self, id: u32, result: Result<ScoutRecord, u16>) -> Self {
        self.results.insert(id, result);
        self
    }

    fn calls(&self, id: u32) -> usize {
        self.calls.get(&id).copied().unwrap_or(0)
    }
}

impl ScoutSource for FakeSource {
    fn fetch(&mut self, player_id: u32) -> Result<ScoutRecord, FetchError> {
        *self.calls.entry(player_id).or_insert(0) += 1;
        match self.results.get(&player_id) {
            Some(Ok(rec)) => Ok(rec.clone()),
            Some(Err(status)) => Err(FetchError::Http { status: *status }),
            None => Err(FetchError::Net("no route".into())),
        }
    }
}

fn annotator() -> Annotator {
    Annotator::with_stagger(Duration::ZERO)
}

fn status_of(page: &RosterPage, i: usize) -> &str {
    page.containers()[i].status.as_deref().unwrap_or("")
}

#[test]
fn terminal_statuses_per_container() {
    let html = format!(
        "{}{}{}{}{}",
        container(1, true, true, &["Passing"]),   // flags applied
        container(2, false, true, &["Passing"]),  // no scout link
        container(3, true, false, &[]),           // no skills table
        container(4, true, true, &["Passing"]),   // empty report
        container(5, true, true, &["Passing"]),   // http error
    );
    let mut page = RosterPage::parse(&html, 0);
    let mut source = FakeSource::default()
        .with(1, Ok(record(&["Passing"], Some(4))))
        .with(4, Ok(ScoutRecord::default()))
        .with(5, Err(404));

    let mut ann = annotator();
    ann.scan(&mut page, &mut source, None);

    assert_eq!(status_of(&page, 0), STATUS_FLAGS_ADDED);
    assert_eq!(status_of(&page, 1), STATUS_NO_LINK);
    assert_eq!(status_of(&page, 2), STATUS_NO_TABLE);
    assert_eq!(status_of(&page, 3), STATUS_NO_INFO);
    assert!(status_of(&page, 4).starts_with("Scout error:"), "got {:?}", status_of(&page, 4));

    // One failure never blocks the others.
    assert_eq!(source.calls(1), 1);
    assert_eq!(source.calls(5), 1);
    // Containers without link or table never hit the source.
    assert_eq!(source.calls(2), 0);
    assert_eq!(source.calls(3), 0);

    let rendered = page.render();
    assert!(rendered.contains("flag_green.gif"));
    assert!(rendered.contains(STATUS_NO_LINK));
    assert!(!rendered.contains(STATUS_FETCHING));
}

#[test]
fn rescanning_the_same_nodes_does_not_refetch() {
    let html = container(7, true, true, &["Passing"]);
    let mut page = RosterPage::parse(&html, 0);
    let mut source = FakeSource::default().with(7, Ok(record(&["Passing"], Some(3))));

    let mut ann = annotator();
    ann.scan(&mut page, &mut source, None);
    ann.scan(&mut page, &mut source, None);
    assert_eq!(source.calls(7), 1);
}

#[test]
fn recreated_nodes_repaint_from_memory_without_network() {
    let html = container(8, true, true, &["Passing"]);
    let mut source = FakeSource::default().with(8, Ok(record(&["Passing"], Some(4))));
    let mut ann = annotator();

    let mut first = RosterPage::parse(&html, 0);
    ann.scan(&mut first, &mut source, None);
    assert_eq!(source.calls(8), 1);

    // The site rebuilt the card: same player, brand-new node.
    let mut rebuilt = RosterPage::parse(&html, 1);
    ann.scan(&mut rebuilt, &mut source, None);
    ann.reapply(&mut rebuilt);

    assert_eq!(source.calls(8), 1, "repaint must not refetch");
    assert_eq!(status_of(&rebuilt, 0), STATUS_FLAGS_ADDED);
    assert!(rebuilt.render().contains("flag_green.gif"));
}

#[test]
fn reapply_restores_flags_lost_to_a_dom_rebuild() {
    let html = container(9, true, true, &["Passing", "Tackling"]);
    let mut source = FakeSource::default().with(9, Ok(record(&["Passing"], Some(4))));
    let mut ann = annotator();

    let mut page = RosterPage::parse(&html, 0);
    ann.scan(&mut page, &mut source, None);
    let flagged = page.render();

    // Fresh parse of the *un-annotated* source drops the injected icons.
    let mut stripped = RosterPage::parse(&html, 1);
    ann.reapply(&mut stripped);
    assert_eq!(
        stripped.render().matches("flag_green.gif").count(),
        flagged.matches("flag_green.gif").count()
    );
}

#[test]
fn containers_without_player_id_are_skipped() {
    let html = format!(
        r#"<div class="playercard"><div class="playerhead">Nameless</div></div>{}"#,
        container(10, true, true, &["Passing"])
    );
    let page = RosterPage::parse(&html, 0);
    assert_eq!(page.containers().len(), 1);
    assert_eq!(page.containers()[0].player_id, 10);
}

/// Feed that replays a fixed set of page revisions.
struct ScriptedFeed {
    changes: Vec<PageChange>,
}

impl ChangeFeed for ScriptedFeed {
    fn poll(&mut self) -> Option<PageChange> {
        if self.changes.is_empty() { None } else { Some(self.changes.remove(0)) }
    }
}

#[test]
fn watch_loop_annotates_every_revision_with_one_fetch_per_player() {
    // Revision 1: player 20 alone. Revision 2: the site re-rendered and a
    // second player appeared.
    let rev1 = container(20, true, true, &["Passing"]);
    let rev2 = format!(
        "{}{}",
        container(20, true, true, &["Passing"]),
        container(21, true, true, &["Tackling"])
    );
    let mut feed = ScriptedFeed {
        changes: vec![
            PageChange { revision: 1, html: rev1 },
            PageChange { revision: 2, html: rev2 },
        ],
    };
    let mut source = FakeSource::default()
        .with(20, Ok(record(&["Passing"], Some(3))))
        .with(21, Ok(record(&["Tackling"], Some(4))));

    let mut ann = annotator();
    let mut rendered: Vec<String> = Vec::new();
    let mut sink = |page: &RosterPage| rendered.push(page.render());
    watch::run(&mut ann, &mut feed, &mut source, None, &mut sink);

    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].matches("flag_green.gif").count(), 2);
    assert_eq!(rendered[1].matches("flag_green.gif").count(), 5);
    assert_eq!(source.calls(20), 1, "player 20 must be fetched exactly once");
    assert_eq!(source.calls(21), 1);
}

/// Progress sink that records every callback.
#[derive(Default)]
struct CountingProgress {
    begins: Vec<usize>,
    items: Vec<u32>,
    finishes: usize,
}

impl Progress for CountingProgress {
    fn begin(&mut self, total: usize) {
        self.begins.push(total);
    }

    fn item_done(&mut self, player_id: u32) {
        self.items.push(player_id);
    }

    fn finish(&mut self) {
        self.finishes += 1;
    }
}

#[test]
fn watch_loop_drives_one_progress_sink_across_revisions() {
    let rev1 = container(30, true, true, &["Passing"]);
    let rev2 = format!(
        "{}{}",
        container(30, true, true, &["Passing"]),
        container(31, true, true, &["Tackling"])
    );
    let mut feed = ScriptedFeed {
        changes: vec![
            PageChange { revision: 1, html: rev1 },
            PageChange { revision: 2, html: rev2 },
        ],
    };
    let mut source = FakeSource::default()
        .with(30, Ok(record(&["Passing"], Some(3))))
        .with(31, Ok(record(&["Tackling"], Some(4))));

    let mut ann = annotator();
    let mut progress = CountingProgress::default();
    let mut sink = |_page: &RosterPage| {};
    watch::run(&mut ann, &mut feed, &mut source, Some(&mut progress), &mut sink);

    // One begin/finish pair per page change, with that revision's totals.
    assert_eq!(progress.begins, vec![1, 2]);
    assert_eq!(progress.finishes, 2);
    // Revision 2 repaints player 30 from memory and fetches player 31.
    assert_eq!(progress.items, vec![30, 30, 31]);

    let mut ids: Vec<u32> = ann.processed().keys().copied().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![30, 31]);
    assert_eq!(ann.processed()[&31].highest, vec!["Tackling"]);
}
