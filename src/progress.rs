// src/progress.rs
/// Lightweight progress reporting for the long-running annotation pass.
/// Frontends implement this to surface per-container status to users.
pub trait Progress {
    /// Called at the start with the number of containers on the page.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one container reached a terminal state.
    fn item_done(&mut self, _player_id: u32) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
