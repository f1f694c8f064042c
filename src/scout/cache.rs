// src/scout/cache.rs
// Local scout-report cache: one JSON file per player under .store/scout/.
//
// Every failure mode here degrades to a cache miss or a no-op. The fetch
// pipeline must keep working with a broken store, so nothing propagates.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::config::consts::{
    CACHE_PREFIX, CACHE_TTL_DAYS, CACHE_VERSION, SCOUT_STORE_SUBDIR, STORE_DIR,
};
use crate::scout::report::ScoutRecord;

/// Persisted entry shape: `{ "scoutData": …, "cached": ms, "expires": ms }`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    scout_data: ScoutRecord,
    cached: u64,
    expires: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_cached: usize,
    pub total_size: u64,
    pub cache_keys: Vec<String>,
}

pub struct ScoutCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ScoutCache {
    pub fn open_default() -> Self {
        Self::new(PathBuf::from(STORE_DIR).join(SCOUT_STORE_SUBDIR))
    }

    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_ttl(dir, Duration::from_secs(CACHE_TTL_DAYS * 24 * 60 * 60))
    }

    pub fn with_ttl<P: Into<PathBuf>>(dir: P, ttl: Duration) -> Self {
        Self { dir: dir.into(), ttl }
    }

    /// Versioned, namespaced key. Bumping CACHE_VERSION orphans old entries
    /// instead of reinterpreting them.
    pub fn key(player_id: u32) -> String {
        format!("{}.{}.{}", CACHE_PREFIX, CACHE_VERSION, player_id)
    }

    fn path_for(&self, player_id: u32) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key(player_id)))
    }

    /// Missing, unreadable, unparsable or expired entries all read as a miss.
    /// An expired entry is deleted on the way out.
    pub fn get(&self, player_id: u32) -> Option<ScoutRecord> {
        let path = self.path_for(player_id);
        let text = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) => {
                logd!("cache entry {} unparsable: {}", Self::key(player_id), e);
                return None;
            }
        };
        if now_ms() >= entry.expires {
            logd!("cache entry {} expired", Self::key(player_id));
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(entry.scout_data)
    }

    /// Best-effort write; a full disk or unwritable store just means this
    /// player goes uncached.
    pub fn set(&self, player_id: u32, record: &ScoutRecord) {
        let now = now_ms();
        let entry = CacheEntry {
            scout_data: record.clone(),
            cached: now,
            expires: now + self.ttl.as_millis() as u64,
        };
        let json = match serde_json::to_string(&entry) {
            Ok(j) => j,
            Err(e) => {
                loge!("cache serialize failed for {}: {}", Self::key(player_id), e);
                return;
            }
        };
        if let Err(e) = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.path_for(player_id), json))
        {
            loge!("cache write failed for {}: {}", Self::key(player_id), e);
        }
    }

    /// Remove every entry under the namespace prefix (any schema version),
    /// leaving unrelated files alone. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let mut removed = 0usize;
        for path in self.entry_paths() {
            if fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats { total_cached: 0, total_size: 0, cache_keys: Vec::new() };
        for path in self.entry_paths() {
            stats.total_cached += 1;
            stats.total_size += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stats.cache_keys.push(stem.to_string());
            }
        }
        stats.cache_keys.sort();
        stats
    }

    fn entry_paths(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let Ok(entries) = fs::read_dir(&self.dir) else { return out };
        let prefix = format!("{}.", CACHE_PREFIX);
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if name.starts_with(&prefix) && name.ends_with(".json") {
                out.push(path);
            }
        }
        out
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
