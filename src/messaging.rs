// src/messaging.rs
// Request/response boundary for the cache-management frontend (and the CLI's
// cache commands). JSON in, JSON out; a bad request is an error payload,
// never a failure.

use serde::Deserialize;
use serde_json::json;

use crate::scout::cache::ScoutCache;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "GET_CACHE_STATS")]
    GetCacheStats,
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache,
    #[serde(rename = "PING")]
    Ping,
}

pub fn handle(raw: &str, cache: &ScoutCache) -> String {
    let req = match serde_json::from_str::<Request>(raw) {
        Ok(r) => r,
        Err(e) => return json!({ "error": format!("bad request: {}", e) }).to_string(),
    };
    match req {
        Request::GetCacheStats => json!({ "stats": cache.stats() }).to_string(),
        Request::ClearCache => {
            let cleared = cache.clear_all();
            logf!("cache cleared, {} entries removed", cleared);
            json!({ "clearedCount": cleared }).to_string()
        }
        Request::Ping => json!({ "msg": "pong from bb_scout" }).to_string(),
    }
}
