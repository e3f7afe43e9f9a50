//! Outer scheduling loop.
//!
//! Runs a cycle, sleeps the poll interval, repeats. A cycle that fails
//! outright is logged and followed by the shorter error cooldown instead.
//! The shutdown future is the only way out; it is checked before each
//! cycle, while a cycle runs, and during every sleep.

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

use crate::types::CycleReport;

/// Anything the loop can drive once per tick.
#[async_trait]
pub trait PollCycle: Send {
    async fn run_once(&mut self) -> Result<CycleReport>;
}

#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Sleep after a cycle that completed.
    pub interval: Duration,
    /// Sleep after a cycle that returned an error.
    pub cooldown: Duration,
}

/// Totals over the lifetime of one `run_until` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles_ok: u64,
    pub cycles_failed: u64,
    pub articles_sent: usize,
}

/// Drive `cycle` until `shutdown` resolves.
///
/// An in-flight cycle is dropped when shutdown arrives; whatever the last
/// completed cycle persisted stays on disk.
pub async fn run_until<C, F>(cycle: &mut C, schedule: Schedule, shutdown: F) -> RunSummary
where
    C: PollCycle + ?Sized,
    F: Future,
{
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        let outcome = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            res = cycle.run_once() => res,
        };

        let pause = match outcome {
            Ok(report) => {
                summary.cycles_ok += 1;
                summary.articles_sent += report.sent;
                log_cycle_report(&report);
                info!(secs = schedule.interval.as_secs(), "Sleeping until next cycle");
                schedule.interval
            }
            Err(e) => {
                summary.cycles_failed += 1;
                error!(error = %e, cooldown_secs = schedule.cooldown.as_secs(), "Cycle failed, retrying after cooldown");
                schedule.cooldown
            }
        };

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            _ = tokio::time::sleep(pause) => {}
        }
    }

    summary
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        sent = report.sent,
        fetched = report.fetched,
        seen = report.skipped_seen,
        irrelevant = report.skipped_irrelevant,
        no_id = report.skipped_no_id,
        notify_failed = report.notify_failures,
        fetch_failed = report.fetch_failures,
        persisted = report.persisted,
        "Cycle complete. Sent {} new articles.",
        report.sent
    );
}
