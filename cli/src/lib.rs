//! stdio-sieve binary crate - modules exposed for unit tests

pub mod app;
pub mod commands;
pub mod logging;
