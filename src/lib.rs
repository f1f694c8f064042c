// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;

pub mod messaging;
pub mod page;
pub mod progress;
pub mod scout;
pub mod skills;
