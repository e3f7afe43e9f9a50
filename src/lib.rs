//! Stock news bot — watchlist news relay.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry points.

pub mod config;
pub mod types;
pub mod storage;
pub mod filter;
pub mod news;
pub mod notify;
pub mod engine;
