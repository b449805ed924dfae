//! Check results, run summaries, and their query accessors.

use crate::error::{GuardError, Result};
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Snapshot of the declared columns' values at one failing row, in
/// declared order.
pub type RowValues = Vec<(String, Value)>;

/// Outcome of evaluating one check against a data source.
///
/// Invariants, upheld by construction:
/// - `failing_rows` and `failing_values` align positionally and have equal
///   length;
/// - every failing-row position is 1-based and lies in `[1, total_rows]`,
///   ascending;
/// - `passed` is true exactly when `failing_rows` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    passed: bool,
    failing_rows: Vec<usize>,
    failing_values: Vec<RowValues>,
    message: String,
    total_rows: usize,
}

impl CheckResult {
    /// Result for a check whose rows all passed (including zero rows).
    pub(crate) fn pass(total_rows: usize) -> Self {
        Self {
            passed: true,
            failing_rows: Vec::new(),
            failing_values: Vec::new(),
            message: "All rows passed".to_string(),
            total_rows,
        }
    }

    /// Result for a check with at least one failing row.
    pub(crate) fn fail(
        failing_rows: Vec<usize>,
        failing_values: Vec<RowValues>,
        total_rows: usize,
    ) -> Self {
        debug_assert_eq!(failing_rows.len(), failing_values.len());
        let message = format!("{} rows failed", failing_rows.len());
        Self {
            passed: false,
            failing_rows,
            failing_values,
            message,
            total_rows,
        }
    }

    /// Result for a check whose declared columns are absent from the
    /// source. No rows were evaluated.
    pub(crate) fn missing_columns(missing: &[&str]) -> Self {
        Self {
            passed: false,
            failing_rows: Vec::new(),
            failing_values: Vec::new(),
            message: format!("Missing columns: {}", missing.join(", ")),
            total_rows: 0,
        }
    }

    /// True iff no row failed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// 1-based positions of the failing rows, ascending.
    pub fn failing_rows(&self) -> &[usize] {
        &self.failing_rows
    }

    /// Per-row snapshots of the declared columns, aligned positionally
    /// with [`failing_rows`](CheckResult::failing_rows).
    pub fn failing_values(&self) -> &[RowValues] {
        &self.failing_values
    }

    /// Short diagnostic text: `"All rows passed"` or `"<n> rows failed"`,
    /// or the missing-column message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rows actually evaluated; 0 if required columns were missing.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Percentage of evaluated rows that passed, rounded to one decimal.
    ///
    /// With zero evaluated rows this is 100.0 for a passed check (nothing
    /// to fail) and 0.0 for a failed one (columns were missing).
    pub fn pass_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return if self.passed { 100.0 } else { 0.0 };
        }
        let passed_rows = self.total_rows - self.failing_rows.len();
        round_to_tenth(100.0 * passed_rows as f64 / self.total_rows as f64)
    }

    /// Failure-first display ordering: a failed result sorts before a
    /// passed one, and among results of equal status the one with strictly
    /// more failing rows sorts first. Governs report layout only.
    pub fn severity_order(&self, other: &Self) -> Ordering {
        match (self.passed, other.passed) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => other.failing_rows.len().cmp(&self.failing_rows.len()),
        }
    }
}

/// Aggregate outcome of running a checkset, with timing.
///
/// Created fresh per run and never mutated; carries no reference back to
/// the data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSummary {
    checkset_name: String,
    check_results: HashMap<String, CheckResult>,
    time_elapsed: Duration,
    started_at: DateTime<Utc>,
}

impl CheckSummary {
    pub(crate) fn new(
        checkset_name: impl Into<String>,
        check_results: HashMap<String, CheckResult>,
        time_elapsed: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            checkset_name: checkset_name.into(),
            check_results,
            time_elapsed,
            started_at,
        }
    }

    /// Name of the checkset this summary was produced from.
    pub fn checkset_name(&self) -> &str {
        &self.checkset_name
    }

    /// Per-check results, keyed by check name.
    pub fn check_results(&self) -> &HashMap<String, CheckResult> {
        &self.check_results
    }

    /// Wall-clock duration of the whole run.
    pub fn time_elapsed(&self) -> Duration {
        self.time_elapsed
    }

    /// Wall-clock instant the run began.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of checks in this summary.
    pub fn check_count(&self) -> usize {
        self.check_results.len()
    }

    /// The result of the named check.
    ///
    /// Unknown names are a caller programming error and fail loudly with
    /// [`GuardError::UnknownCheck`].
    pub fn check_result(&self, name: &str) -> Result<&CheckResult> {
        self.check_results
            .get(name)
            .ok_or_else(|| GuardError::UnknownCheck { name: name.into() })
    }

    /// Names of the checks that failed, sorted.
    pub fn failed_checks(&self) -> Vec<String> {
        self.partition(false)
    }

    /// Names of the checks that passed, sorted.
    pub fn passed_checks(&self) -> Vec<String> {
        self.partition(true)
    }

    fn partition(&self, passed: bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .check_results
            .iter()
            .filter(|(_, result)| result.passed() == passed)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Total failing rows across all checks (rows failing several checks
    /// count once per check).
    pub fn total_failures(&self) -> usize {
        self.check_results
            .values()
            .map(|result| result.failing_rows().len())
            .sum()
    }

    /// Aggregate pass rate: the percentage of checks that passed, 0-100,
    /// rounded to one decimal. An empty summary is vacuously 100.0.
    ///
    /// This is check-based, matching the report footer; the row-based form
    /// is [`pass_rate_for`](CheckSummary::pass_rate_for), which is scoped
    /// to a single check.
    pub fn pass_rate(&self) -> f64 {
        if self.check_results.is_empty() {
            return 100.0;
        }
        let passed = self
            .check_results
            .values()
            .filter(|result| result.passed())
            .count();
        round_to_tenth(100.0 * passed as f64 / self.check_results.len() as f64)
    }

    /// Percentage of rows that passed the named check, rounded to one
    /// decimal. Fails with [`GuardError::UnknownCheck`] for unknown names.
    pub fn pass_rate_for(&self, name: &str) -> Result<f64> {
        Ok(self.check_result(name)?.pass_rate())
    }

    /// Failing rows of the named check. Fails with
    /// [`GuardError::UnknownCheck`] for unknown names.
    pub fn failing_rows_for(&self, name: &str) -> Result<&[usize]> {
        Ok(self.check_result(name)?.failing_rows())
    }

    /// Sorted, deduplicated union of failing rows across all checks.
    pub fn failing_rows(&self) -> Vec<usize> {
        let union: BTreeSet<usize> = self
            .check_results
            .values()
            .flat_map(|result| result.failing_rows().iter().copied())
            .collect();
        union.into_iter().collect()
    }
}

fn round_to_tenth(percentage: f64) -> f64 {
    (percentage * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(rows: Vec<usize>, total: usize) -> CheckResult {
        let values = rows.iter().map(|_| RowValues::new()).collect();
        CheckResult::fail(rows, values, total)
    }

    fn summary(results: Vec<(&str, CheckResult)>) -> CheckSummary {
        let map = results
            .into_iter()
            .map(|(name, result)| (name.to_string(), result))
            .collect();
        CheckSummary::new("test", map, Duration::from_millis(5), Utc::now())
    }

    #[test]
    fn test_result_invariants() {
        let result = failed(vec![2, 4], 5);
        assert!(!result.passed());
        assert_eq!(result.failing_rows().len(), result.failing_values().len());
        assert_eq!(result.message(), "2 rows failed");

        let passed = CheckResult::pass(5);
        assert!(passed.passed());
        assert!(passed.failing_rows().is_empty());
        assert_eq!(passed.message(), "All rows passed");
    }

    #[test]
    fn test_missing_columns_result() {
        let result = CheckResult::missing_columns(&["a", "b"]);
        assert!(!result.passed());
        assert_eq!(result.total_rows(), 0);
        assert_eq!(result.message(), "Missing columns: a, b");
        assert_eq!(result.pass_rate(), 0.0);
    }

    #[test]
    fn test_severity_order() {
        let one_failure = failed(vec![1], 5);
        let two_failures = failed(vec![1, 2], 5);
        let passed = CheckResult::pass(5);

        assert_eq!(one_failure.severity_order(&passed), Ordering::Less);
        assert_eq!(passed.severity_order(&one_failure), Ordering::Greater);
        assert_eq!(two_failures.severity_order(&one_failure), Ordering::Less);
        assert_eq!(passed.severity_order(&passed.clone()), Ordering::Equal);
    }

    #[test]
    fn test_partitions_sorted() {
        let s = summary(vec![
            ("c", failed(vec![1], 3)),
            ("a", CheckResult::pass(3)),
            ("b", failed(vec![1, 2], 3)),
        ]);
        assert_eq!(s.failed_checks(), vec!["b", "c"]);
        assert_eq!(s.passed_checks(), vec!["a"]);
        assert_eq!(s.total_failures(), 3);
    }

    #[test]
    fn test_aggregate_pass_rate_is_check_based() {
        let s = summary(vec![
            ("a", CheckResult::pass(10)),
            ("b", CheckResult::pass(10)),
            ("c", failed(vec![1], 10)),
        ]);
        assert_eq!(s.pass_rate(), 66.7);
        assert_eq!(summary(vec![]).pass_rate(), 100.0);
    }

    #[test]
    fn test_scoped_pass_rate_is_row_based() {
        let s = summary(vec![("a", failed(vec![1], 3))]);
        assert_eq!(s.pass_rate_for("a").unwrap(), 66.7);
        assert!(matches!(
            s.pass_rate_for("nope"),
            Err(GuardError::UnknownCheck { .. })
        ));
    }

    #[test]
    fn test_failing_rows_union() {
        let s = summary(vec![
            ("a", failed(vec![2, 4], 5)),
            ("b", failed(vec![1, 2, 5], 5)),
            ("c", CheckResult::pass(5)),
        ]);
        assert_eq!(s.failing_rows(), vec![1, 2, 4, 5]);
        assert_eq!(s.failing_rows_for("a").unwrap(), &[2, 4]);
        assert!(s.failing_rows_for("zzz").is_err());
    }
}
