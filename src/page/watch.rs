// src/page/watch.rs
// Change observation as a capability: "tell me when the page changed" is a
// trait, so the real file-mtime poller and scripted test feeds are
// interchangeable.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime};

use crate::config::consts::SETTLE_MS;
use crate::page::dom::RosterPage;
use crate::page::scan::Annotator;
use crate::progress::Progress;
use crate::scout::fetch::ScoutSource;

pub struct PageChange {
    pub revision: u64,
    pub html: String,
}

pub trait ChangeFeed {
    /// Block until the page changes; None ends the watch loop.
    fn poll(&mut self) -> Option<PageChange>;
}

/// Concrete feed: polls a saved roster page for mtime changes. The first
/// poll reports the file as-is so the loop annotates the initial state too.
pub struct FileFeed {
    path: PathBuf,
    interval: Duration,
    last_mtime: Option<SystemTime>,
    next_revision: u64,
}

impl FileFeed {
    pub fn new<P: Into<PathBuf>>(path: P, interval: Duration) -> Self {
        Self { path: path.into(), interval, last_mtime: None, next_revision: 1 }
    }

    fn mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn emit(&mut self) -> Option<PageChange> {
        let html = std::fs::read_to_string(&self.path).ok()?;
        let revision = self.next_revision;
        self.next_revision += 1;
        Some(PageChange { revision, html })
    }
}

impl ChangeFeed for FileFeed {
    fn poll(&mut self) -> Option<PageChange> {
        loop {
            let mtime = self.mtime();
            if self.last_mtime.is_none() || (mtime.is_some() && mtime != self.last_mtime) {
                self.last_mtime = mtime;
                return self.emit();
            }
            if mtime.is_none() {
                // File gone: the page went away, stop watching.
                return None;
            }
            thread::sleep(self.interval);
        }
    }
}

/// Observer loop: on every reported change, wait the settle delay, re-parse,
/// scan for brand-new containers (only unseen ones fetch) and repaint every
/// present container with an in-memory record. `sink` receives each
/// annotated page, e.g. to write the rendered HTML back out.
pub fn run(
    annotator: &mut Annotator,
    feed: &mut dyn ChangeFeed,
    source: &mut dyn ScoutSource,
    mut progress: Option<&mut dyn Progress>,
    sink: &mut dyn FnMut(&RosterPage),
) {
    while let Some(change) = feed.poll() {
        thread::sleep(Duration::from_millis(SETTLE_MS));
        logd!("page change, revision {}", change.revision);
        let mut page = RosterPage::parse(&change.html, change.revision);
        // Reborrow per iteration; handing the Option itself over would pin
        // the &mut dyn borrow to the loop's outer lifetime.
        match progress.as_mut() {
            Some(p) => annotator.scan(&mut page, source, Some(&mut **p)),
            None => annotator.scan(&mut page, source, None),
        }
        annotator.reapply(&mut page);
        sink(&page);
    }
}
