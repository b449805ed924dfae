//! Deterministic rendering of checksets and run summaries.
//!
//! The text report is the primary human-facing output; the JSON formatter
//! serializes the full summary for programmatic consumption. Report layout
//! is failure-first: failed checks come before passed ones, and checks
//! with more failing rows come first, so the most broken data is at the
//! top of the report.

use crate::core::{CheckResult, CheckSet, CheckSummary, RowValues};
use crate::error::Result;
use std::fmt::Write;

/// How many failing rows are shown at each end of a capped listing.
const FAILURE_WINDOW: usize = 5;

/// Formats a run summary into some textual representation.
///
/// # Examples
///
/// ```rust,ignore
/// use rowguard::report::{JsonFormatter, ReportFormatter};
///
/// let output = JsonFormatter::new().format(&summary)?;
/// ```
pub trait ReportFormatter {
    /// Formats the summary.
    fn format(&self, summary: &CheckSummary) -> Result<String>;
}

/// Renders the deterministic text report (see [`render_summary`]).
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    /// Creates a text formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, summary: &CheckSummary) -> Result<String> {
        Ok(render_summary(summary))
    }
}

/// Serializes the whole summary as JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing JSON formatter.
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether to pretty-print.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, summary: &CheckSummary) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(output)
    }
}

/// Renders the text report for a run summary.
///
/// One line per check (status glyph, name, message), ordered failure-first
/// with ties broken by name; failed checks get an enumerated per-row
/// listing capped to the first five and last five entries with an explicit
/// `... N more failures` marker in between when the total exceeds ten. The
/// footer gives `<passed>/<total>` checks, the aggregate pass rate, and
/// the elapsed time.
pub fn render_summary(summary: &CheckSummary) -> String {
    let mut out = String::new();
    writeln!(out, "Checkset '{}'", summary.checkset_name()).unwrap();

    let mut entries: Vec<(&String, &CheckResult)> = summary.check_results().iter().collect();
    entries.sort_by(|(name_a, result_a), (name_b, result_b)| {
        result_a
            .severity_order(result_b)
            .then_with(|| name_a.cmp(name_b))
    });

    for (name, result) in entries {
        let glyph = if result.passed() { "✅" } else { "❌" };
        writeln!(out, "  {glyph} {name}: {}", result.message()).unwrap();
        if !result.passed() {
            write_failure_listing(&mut out, result);
        }
    }

    writeln!(out).unwrap();
    writeln!(
        out,
        "{}/{} checks passed ({:.1}%) in {:?}",
        summary.passed_checks().len(),
        summary.check_count(),
        summary.pass_rate(),
        summary.time_elapsed()
    )
    .unwrap();
    out
}

/// Renders a checkset on its own, independent of any run: each check's
/// name, predicate, and declared columns, in declaration order.
pub fn render_checkset(checks: &CheckSet) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "Checkset '{}' ({} checks)",
        checks.name(),
        checks.len()
    )
    .unwrap();
    for check in checks.checks() {
        writeln!(
            out,
            "  - {}: {}({})",
            check.name(),
            check.predicate_name(),
            check.columns().join(", ")
        )
        .unwrap();
    }
    out
}

fn write_failure_listing(out: &mut String, result: &CheckResult) {
    let rows = result.failing_rows();
    let values = result.failing_values();
    let total = rows.len();

    if total <= 2 * FAILURE_WINDOW {
        for ordinal in 0..total {
            write_failure_line(out, ordinal, rows, values);
        }
    } else {
        for ordinal in 0..FAILURE_WINDOW {
            write_failure_line(out, ordinal, rows, values);
        }
        writeln!(out, "       ... {} more failures", total - 2 * FAILURE_WINDOW).unwrap();
        for ordinal in (total - FAILURE_WINDOW)..total {
            write_failure_line(out, ordinal, rows, values);
        }
    }
}

fn write_failure_line(out: &mut String, ordinal: usize, rows: &[usize], values: &[RowValues]) {
    let rendered: Vec<String> = values[ordinal]
        .iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect();
    writeln!(
        out,
        "       {}) row {}: {}",
        ordinal + 1,
        rows[ordinal],
        rendered.join(", ")
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PredicateRegistry;
    use crate::dsl::compile;
    use crate::engine::run;
    use crate::source::MemorySource;
    use crate::value::Value;

    fn summary_for(column: Vec<i64>) -> CheckSummary {
        let mut predicates = PredicateRegistry::new();
        predicates.register_fn("is_positive", |row: &[Value]| {
            row[0].as_f64().is_some_and(|v| v > 0.0)
        });
        predicates.register_fn("never", |_row: &[Value]| false);
        let checks = compile(
            "report_demo",
            r#"
            "positive": is_positive(a);
            "doomed": never(a)
            "#,
            &predicates,
        )
        .unwrap();
        let data = MemorySource::new().with_column("a", column);
        run(&data, &checks, false)
    }

    #[test]
    fn test_text_report_orders_failures_first() {
        let output = render_summary(&summary_for(vec![1, -2, 3]));
        let doomed = output.find("❌ doomed: 3 rows failed").unwrap();
        let positive = output.find("❌ positive: 1 rows failed").unwrap();
        assert!(doomed < positive);
        assert!(output.starts_with("Checkset 'report_demo'"));
        assert!(output.contains("0/2 checks passed (0.0%)"));
        assert!(output.contains("1) row 2: a=-2"));
    }

    #[test]
    fn test_text_report_caps_long_listings() {
        let output = render_summary(&summary_for((1..=12).collect()));
        assert!(output.contains("❌ doomed: 12 rows failed"));
        assert!(output.contains("5) row 5: a=5"));
        assert!(output.contains("... 2 more failures"));
        assert!(output.contains("8) row 8: a=8"));
        assert!(output.contains("12) row 12: a=12"));
        assert!(!output.contains("6) row 6"));
        assert!(output.contains("✅ positive: All rows passed"));
    }

    #[test]
    fn test_text_report_shows_all_when_at_cap() {
        let output = render_summary(&summary_for((1..=10).collect()));
        assert!(!output.contains("more failures"));
        assert!(output.contains("10) row 10: a=10"));
    }

    #[test]
    fn test_render_checkset_is_run_independent() {
        let mut predicates = PredicateRegistry::new();
        predicates.register_fn("gt", |_row: &[Value]| true);
        let checks = compile("static_demo", r#""a over b": gt(a, b)"#, &predicates).unwrap();

        let output = render_checkset(&checks);
        assert_eq!(
            output,
            "Checkset 'static_demo' (1 checks)\n  - a over b: gt(a, b)\n"
        );
    }

    #[test]
    fn test_json_formatter_round_trips() {
        let summary = summary_for(vec![1, -2]);
        let output = JsonFormatter::new().format(&summary).unwrap();
        assert!(output.contains("\"report_demo\""));
        assert!(output.contains("\"failing_rows\""));

        let compact = JsonFormatter::new().with_pretty(false).format(&summary).unwrap();
        assert!(!compact.contains('\n'));
    }
}
