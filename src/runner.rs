//! Branch scheduling.
//!
//! One task per enumerated branch runs on a bounded rayon pool. Every task
//! opens its own source handle, so an FTP cursor is never shared. Results come
//! back over a channel in completion order and are slotted by branch index
//! before aggregation.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::aggregate::{BranchFailure, RunReport};
use crate::error::Result;
use crate::policy::{TraversalPolicy, Unit};
use crate::source::SourceOpener;

pub const DEFAULT_CONCURRENCY: usize = 4;

const ENUMERATED_PERCENT: u8 = 10;
const TASKS_PERCENT: usize = 80;

/// Receives progress percentages (0..=100).
pub trait ProgressSink: Sync {
    fn set_percent(&self, percent: u8);
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_percent(&self, _percent: u8) {}
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Upper bound on concurrently running branch tasks.
    pub concurrency: usize,
    /// Free-text label used only for the artifact name.
    pub period: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            period: None,
        }
    }
}

/// Forwards only increases, whatever order completions arrive in.
struct MonotonicProgress<'a> {
    sink: &'a dyn ProgressSink,
    current: AtomicU8,
}

impl<'a> MonotonicProgress<'a> {
    fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            current: AtomicU8::new(0),
        }
    }

    fn advance(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.current.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            self.sink.set_percent(percent);
        }
    }

    fn completed(&self, done: usize, total: usize) {
        let share = TASKS_PERCENT * done / total.max(1);
        let percent = usize::from(ENUMERATED_PERCENT) + share;
        self.advance(u8::try_from(percent).unwrap_or(100));
    }
}

/// Run `policy` against the tree `opener` connects to.
///
/// # Errors
/// Fails only on root-level problems: opening the root handle or enumerating
/// branches. Branch failures are logged, listed in the report and replaced by
/// the policy's fallback records.
pub fn run<O, P>(
    opener: &O,
    policy: &P,
    options: &RunOptions,
    progress: &dyn ProgressSink,
) -> Result<RunReport>
where
    O: SourceOpener,
    P: TraversalPolicy,
{
    let started = Instant::now();
    let progress = MonotonicProgress::new(progress);

    let mut root = opener.open()?;
    let units = policy.enumerate_units(&mut root)?;
    info!(branches = units.len(), "Enumerated branches");
    progress.advance(ENUMERATED_PERCENT);

    let outcomes = if units.len() <= 1 || options.concurrency <= 1 {
        let mut outcomes = Vec::with_capacity(units.len());
        for (done, unit) in units.iter().enumerate() {
            outcomes.push(policy.emit_records(&mut root, unit));
            progress.completed(done + 1, units.len());
        }
        outcomes
    } else {
        drop(root);
        run_parallel(opener, policy, &units, options.concurrency, &progress)?
    };

    let mut failures = Vec::new();
    let slots: Vec<Option<P::Records>> = units
        .iter()
        .zip(outcomes)
        .map(|(unit, outcome)| match outcome {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(branch = %unit.name, error = %e, "Branch traversal failed");
                failures.push(BranchFailure {
                    branch: unit.name.clone(),
                    message: e.to_string(),
                });
                policy.fallback_records(unit)
            }
        })
        .collect();

    let result = policy.aggregate(&units, slots);
    progress.advance(100);

    let elapsed = started.elapsed();
    info!(
        branches = units.len(),
        failed = failures.len(),
        elapsed_ms = elapsed.as_millis(),
        "Run finished"
    );
    Ok(RunReport::new(
        result,
        policy.artifact_name(options.period.as_deref()),
        elapsed,
        failures,
    ))
}

/// One task per unit on a pool of `concurrency` threads. The returned vector
/// is in unit order regardless of completion order.
fn run_parallel<O, P>(
    opener: &O,
    policy: &P,
    units: &[Unit],
    concurrency: usize,
    progress: &MonotonicProgress<'_>,
) -> Result<Vec<Result<P::Records>>>
where
    O: SourceOpener,
    P: TraversalPolicy,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .thread_name(|i| format!("branch-worker-{i}"))
        .build()
        .map_err(std::io::Error::other)?;

    let mut slots: Vec<Option<Result<P::Records>>> = units.iter().map(|_| None).collect();
    let (tx, rx) = mpsc::channel();

    pool.in_place_scope(|scope| {
        for (idx, unit) in units.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                debug!(branch = %unit.name, "Branch task started");
                let outcome = opener
                    .open()
                    .and_then(|mut source| policy.emit_records(&mut source, unit));
                // Receiver outlives every task in this scope.
                let _ = tx.send((idx, outcome));
            });
        }
        drop(tx);

        let mut done = 0;
        for (idx, outcome) in rx {
            done += 1;
            slots[idx] = Some(outcome);
            progress.completed(done, units.len());
        }
    });

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
