//! # rowguard - Predicate Checksets for Tabular Data
//!
//! rowguard validates in-memory tabular datasets against a set of named
//! boolean predicates ("checks"), producing row-level failure diagnostics
//! and aggregate pass/fail reports. Checks are written in a small
//! declaration language, compiled once into an immutable [`CheckSet`],
//! and run against any data source that can hand out columns.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowguard::prelude::*;
//!
//! # fn main() -> rowguard::error::Result<()> {
//! // Expose Rust predicates to the declaration language.
//! let mut predicates = PredicateRegistry::new();
//! predicates.register_fn("is_positive", |row| {
//!     row[0].as_f64().is_some_and(|v| v > 0.0)
//! });
//! predicates.register_fn("gt", |row| match (row[0].as_f64(), row[1].as_f64()) {
//!     (Some(a), Some(b)) => a > b,
//!     _ => false,
//! });
//!
//! // Compile declarations into a reusable checkset.
//! let checks = compile(
//!     "orders",
//!     r#"
//!     "amount is positive": is_positive(amount);
//!     "gross covers net":   gt(gross, net);
//!     "#,
//!     &predicates,
//! )?;
//!
//! // Run against any DataSource, sequentially or concurrently.
//! let data = MemorySource::new()
//!     .with_column("amount", [120.0, -3.5, 40.0])
//!     .with_column("gross", [10.0, 20.0, 30.0])
//!     .with_column("net", [8.0, 25.0, 24.0]);
//! let summary = run(&data, &checks, false);
//!
//! assert_eq!(summary.failed_checks(), vec!["amount is positive", "gross covers net"]);
//! assert_eq!(summary.failing_rows_for("amount is positive")?, &[2]);
//! println!("{}", render_summary(&summary));
//! # Ok(())
//! # }
//! ```
//!
//! ## How Failures Work
//!
//! A row fails a check when its predicate returns `Ok(false)`, returns
//! `Err`, or panics; evaluation errors are contained at row granularity
//! and never abort the run. Missing declared columns fail the whole check
//! up front with zero rows evaluated. Either way, one run always yields a
//! complete report across all checks: only declaration mistakes (compile
//! errors) and unknown-name lookups are hard errors.
//!
//! ## Architecture
//!
//! - **`dsl`**: declaration lexer, parser, and the `compile` entry point
//! - **`core`**: `Check`, `CheckSet`, `CheckResult`, `CheckSummary`, and
//!   the predicate registry
//! - **`engine`**: sequential and worker-pool execution over a data source
//! - **`source`**: the `DataSource` capability and the bundled
//!   `MemorySource`
//! - **`report`**: deterministic text reports and JSON serialization
//! - **`logging`**: `tracing` subscriber setup helpers
//!
//! Concurrency is check-granular: the engine never splits one check's row
//! loop, and sequential and concurrent runs produce content-identical
//! summaries.

pub mod core;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod source;
pub mod value;
