// src/scout/fetch.rs

use thiserror::Error;

use crate::config::consts::{SCOUT_PATH_TMPL, SPORT};
use crate::core::net::{self, NetError};
use crate::scout::cache::ScoutCache;
use crate::scout::report::{self, ScoutRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("scout report returned HTTP {status}")]
    Http { status: u16 },
    #[error("scout report request failed: {0}")]
    Net(String),
}

/// Where scout records come from. The annotator only sees this seam, so
/// tests can script results without a network or a store.
pub trait ScoutSource {
    fn fetch(&mut self, player_id: u32) -> Result<ScoutRecord, FetchError>;
}

/// The raw GET underneath the fetcher. `core::net::http_get` in production;
/// tests swap in a counting stub.
pub type Transport = Box<dyn FnMut(&str, Option<&str>) -> Result<String, NetError>>;

/// Cache-first fetcher: hit returns immediately, miss does exactly one GET,
/// parses and caches the result. No retries; pacing is the caller's job.
pub struct ScoutFetcher {
    cache: ScoutCache,
    cookie: Option<String>,
    transport: Transport,
}

impl ScoutFetcher {
    pub fn new(cache: ScoutCache, cookie: Option<String>) -> Self {
        Self::with_transport(cache, cookie, Box::new(net::http_get))
    }

    pub fn with_transport(cache: ScoutCache, cookie: Option<String>, transport: Transport) -> Self {
        Self { cache, cookie, transport }
    }

    pub fn cache(&self) -> &ScoutCache {
        &self.cache
    }

    fn build_path(player_id: u32) -> String {
        SCOUT_PATH_TMPL
            .replace("{id}", &player_id.to_string())
            .replace("{sport}", SPORT)
    }
}

impl ScoutSource for ScoutFetcher {
    fn fetch(&mut self, player_id: u32) -> Result<ScoutRecord, FetchError> {
        if let Some(record) = self.cache.get(player_id) {
            logd!("scout {}: cache hit", player_id);
            return Ok(record);
        }

        let path = Self::build_path(player_id);
        logf!("scout {}: fetching {}", player_id, path);
        let body = (self.transport)(&path, self.cookie.as_deref()).map_err(|e| match e {
            NetError::Http { status, .. } => FetchError::Http { status },
            other => FetchError::Net(other.to_string()),
        })?;

        let record = report::parse(&body);
        self.cache.set(player_id, &record);
        Ok(record)
    }
}
