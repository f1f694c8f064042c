// src/page/mod.rs

pub mod dom;
pub mod flags;
pub mod scan;
pub mod watch;

pub use dom::{FlagColor, PlayerContainer, RosterPage, SkillCell, SkillRow};
pub use scan::Annotator;
pub use watch::{ChangeFeed, FileFeed, PageChange};
