//! Core engine — the poll → filter → dedup → notify cycle and the loop
//! that schedules it.

pub mod cycle;
pub mod runner;

pub use cycle::{fetch_window, NewsCycle, Pacing};
pub use runner::{run_until, PollCycle, RunSummary, Schedule};
