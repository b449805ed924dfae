//! Prelude for commonly used types and traits in rowguard.

pub use crate::core::{
    Check, CheckResult, CheckSet, CheckSummary, Predicate, PredicateOutcome, PredicateRegistry,
    RowValues,
};
pub use crate::dsl::compile;
pub use crate::engine::run;
pub use crate::error::{GuardError, Result};
pub use crate::report::{
    render_checkset, render_summary, JsonFormatter, ReportFormatter, TextFormatter,
};
pub use crate::source::{DataSource, MemorySource};
pub use crate::value::Value;
