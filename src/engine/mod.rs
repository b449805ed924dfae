//! The checkset execution engine.
//!
//! Evaluates every check in a [`CheckSet`] against a [`DataSource`],
//! sequentially or across a run-scoped worker pool, producing one
//! [`CheckResult`] per check.
//!
//! Failure semantics are exception-as-failure: a row fails when its
//! predicate returns `Ok(false)`, returns `Err`, or panics. Evaluation
//! errors are contained at row granularity and never abort the enclosing
//! check or the run; missing declared columns fail the check up front with
//! zero rows evaluated. Every row is always evaluated, so the full failure
//! set is captured even after earlier failures.

use crate::core::{Check, CheckResult, CheckSet, CheckSummary, RowValues};
use crate::source::DataSource;
use crate::value::Value;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Runs every check in `checks` against `source`.
///
/// With `concurrent` set, checks (not rows) are distributed over a worker
/// pool bounded by the available hardware parallelism; each check's row
/// loop stays sequential within its worker. Both modes produce
/// content-identical summaries for identical inputs, so the flag is purely
/// a throughput decision.
///
/// # Examples
///
/// ```rust
/// use rowguard::prelude::*;
///
/// let mut predicates = PredicateRegistry::new();
/// predicates.register_fn("is_positive", |row| {
///     row[0].as_f64().is_some_and(|v| v > 0.0)
/// });
/// let checks = compile("demo", r#""positive": is_positive(a)"#, &predicates)?;
/// let data = MemorySource::new().with_column("a", [1, -2, 3, -4, 5]);
///
/// let summary = run(&data, &checks, false);
/// assert_eq!(summary.failing_rows_for("positive")?, &[2, 4]);
/// # Ok::<(), GuardError>(())
/// ```
#[instrument(skip(source, checks), fields(
    checkset.name = %checks.name(),
    checkset.checks = checks.len(),
    run.concurrent = concurrent
))]
pub fn run(source: &dyn DataSource, checks: &CheckSet, concurrent: bool) -> CheckSummary {
    let started_at = chrono::Utc::now();
    let start = Instant::now();
    info!(
        checkset.name = %checks.name(),
        checkset.checks = checks.len(),
        run.concurrent = concurrent,
        "Starting checkset run"
    );

    let results = if concurrent && checks.len() > 1 {
        run_concurrent(source, checks)
    } else {
        checks
            .checks()
            .iter()
            .map(|check| evaluate_check(check, source))
            .collect()
    };

    let mut check_results = HashMap::with_capacity(results.len());
    for (check, result) in checks.checks().iter().zip(results) {
        if check_results
            .insert(check.name().to_string(), result)
            .is_some()
        {
            warn!(
                check.name = %check.name(),
                "Duplicate check name; keeping the later declaration"
            );
        }
    }

    let time_elapsed = start.elapsed();
    let summary = CheckSummary::new(checks.name(), check_results, time_elapsed, started_at);
    info!(
        checkset.name = %checks.name(),
        run.passed = summary.passed_checks().len(),
        run.failed = summary.failed_checks().len(),
        run.row_failures = summary.total_failures(),
        run.duration_ms = time_elapsed.as_millis() as u64,
        "Checkset run completed"
    );
    summary
}

/// Distributes checks over a bounded worker pool scoped to this run.
///
/// Workers pull the next check index from a shared counter and collect
/// `(index, result)` pairs privately; the caller thread merges them back
/// into declaration order, so no locking is needed anywhere.
fn run_concurrent(source: &dyn DataSource, checks: &CheckSet) -> Vec<CheckResult> {
    let items = checks.checks();
    let workers = num_cpus::get().min(items.len()).max(1);
    let next = AtomicUsize::new(0);
    debug!(pool.workers = workers, pool.checks = items.len(), "Starting worker pool");

    let mut indexed = Vec::with_capacity(items.len());
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let next = &next;
                scope.spawn(move || {
                    let mut part = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(check) = items.get(index) else { break };
                        part.push((index, evaluate_check(check, source)));
                    }
                    part
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(part) => indexed.extend(part),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
    });

    indexed.sort_unstable_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
}

/// Evaluates one check: column precondition, then a full sweep of every
/// row.
fn evaluate_check(check: &Check, source: &dyn DataSource) -> CheckResult {
    let available = source.column_names();
    let missing: Vec<&str> = check
        .columns()
        .iter()
        .filter(|column| !available.contains(*column))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        debug!(
            check.name = %check.name(),
            check.missing = ?missing,
            "Declared columns missing; failing check without row evaluation"
        );
        return CheckResult::missing_columns(&missing);
    }

    // The precondition held, but a source may still refuse a column it
    // listed; treat that the same as missing.
    let mut columns: Vec<&[Value]> = Vec::with_capacity(check.columns().len());
    for name in check.columns() {
        match source.column(name) {
            Some(values) => columns.push(values),
            None => return CheckResult::missing_columns(&[name.as_str()]),
        }
    }

    // Columns of one source share a length; clamping keeps row positions
    // in-bounds against a source that breaks that promise.
    let total_rows = columns.iter().map(|values| values.len()).min().unwrap_or(0);

    let mut failing_rows = Vec::new();
    let mut failing_values: Vec<RowValues> = Vec::new();
    for index in 0..total_rows {
        let row: Vec<Value> = columns.iter().map(|values| values[index].clone()).collect();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.predicate().test(&row)));
        if !matches!(outcome, Ok(Ok(true))) {
            failing_rows.push(index + 1);
            failing_values.push(check.columns().iter().cloned().zip(row).collect());
        }
    }

    if failing_rows.is_empty() {
        debug!(check.name = %check.name(), check.rows = total_rows, "Check passed");
        CheckResult::pass(total_rows)
    } else {
        warn!(
            check.name = %check.name(),
            check.rows = total_rows,
            check.failures = failing_rows.len(),
            "Check failed"
        );
        CheckResult::fail(failing_rows, failing_values, total_rows)
    }
}
