// src/config/consts.rs

// Net config
pub const HOST: &str = "dozerverse.com";
pub const PREFIX: &str = "/brutalball/";
pub const SPORT: &str = "brutalball";

// Scout report endpoint, relative to PREFIX
pub const SCOUT_PATH_TMPL: &str = "scout.php?player={id}&sport={sport}";
// Team roster page, relative to PREFIX
pub const TEAM_PATH_TMPL: &str = "team.php?i={id}";

pub const NET_TIMEOUT_SECS: u64 = 15;
pub const COOKIE_ENV: &str = "BB_SCOUT_COOKIE";

// Local cache
pub const STORE_DIR: &str = ".store";
pub const SCOUT_STORE_SUBDIR: &str = "scout";
pub const CACHE_PREFIX: &str = "bbscout";
// Bump to orphan every cached entry on an incompatible schema change.
pub const CACHE_VERSION: &str = "v2";
pub const CACHE_TTL_DAYS: u64 = 30;

// Pacing
pub const FETCH_STAGGER_MS: u64 = 250; // be polite
pub const SETTLE_MS: u64 = 100;        // let the page finish re-rendering
pub const DEFAULT_POLL_MS: u64 = 500;  // file change-feed poll interval

// Flags
pub const FLAG_WIDTH: u32 = 6;
pub const FLAG_HEIGHT: u32 = 10;
pub const FLAG_CELLS: usize = 3;
// Rows missing the usual 4 cells: any cell this narrow counts as a flag cell.
pub const FLAG_CELL_MAX_WIDTH: u32 = 40;
