// tests/fetcher.rs

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use bb_scout::core::net::NetError;
use bb_scout::scout::cache::ScoutCache;
use bb_scout::scout::fetch::{FetchError, ScoutFetcher, ScoutSource};
use bb_scout::scout::report::ScoutRecord;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("bb_scout_fetch_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

const REPORT: &str = concat!(
    r#"<dl class="scoutblock"><dt>Highest potential</dt><dd><ul><li>Passing</li></ul>"#,
    r#"<div class="stars"><i class="star on"></i><i class="star on"></i><i class="star on"></i><i class="star off"></i></div>"#,
    r#"</dd></dl>"#
);

#[test]
fn cached_player_is_served_without_network() {
    let dir = tmp_dir("hit");
    let rec = ScoutRecord {
        highest: vec!["Passing".into()],
        lowest: vec!["Tackling".into()],
        stars_high: Some(4),
        stars_low: Some(1),
    };
    ScoutCache::new(dir.clone()).set(4711, &rec);

    let requests = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&requests);
    let mut fetcher = ScoutFetcher::with_transport(
        ScoutCache::new(dir),
        None,
        Box::new(move |_, _| {
            counter.set(counter.get() + 1);
            Ok(REPORT.to_string())
        }),
    );
    assert_eq!(fetcher.fetch(4711).unwrap(), rec);
    assert_eq!(requests.get(), 0, "cache hit must not touch the transport");
}

#[test]
fn uncached_player_is_fetched_exactly_once() {
    let cache = ScoutCache::new(tmp_dir("miss"));
    let requests = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&requests);
    let mut fetcher = ScoutFetcher::with_transport(
        cache,
        None,
        Box::new(move |path, cookie| {
            assert!(path.contains("player=99"), "unexpected path {:?}", path);
            assert_eq!(cookie, None);
            counter.set(counter.get() + 1);
            Ok(REPORT.to_string())
        }),
    );

    let first = fetcher.fetch(99).unwrap();
    assert_eq!(first.highest, vec!["Passing"]);
    assert_eq!(first.stars_high, Some(3));

    // Second call is a cache hit: still exactly one request.
    let second = fetcher.fetch(99).unwrap();
    assert_eq!(second, first);
    assert_eq!(requests.get(), 1);

    // The miss path populated the persistent store.
    assert!(fetcher.cache().stats().cache_keys.contains(&"bbscout.v2.99".to_string()));
}

#[test]
fn http_failures_surface_the_status_code() {
    let mut fetcher = ScoutFetcher::with_transport(
        ScoutCache::new(tmp_dir("err")),
        None,
        Box::new(|path, _| {
            Err(NetError::Http { status: 404, path: path.to_string() })
        }),
    );
    match fetcher.fetch(7) {
        Err(FetchError::Http { status }) => assert_eq!(status, 404),
        other => panic!("expected HTTP error, got {:?}", other.map(|r| r.highest)),
    }
    // Failures are never cached.
    assert_eq!(fetcher.cache().stats().total_cached, 0);
}
