//! Core validation types: predicates, compiled checks, and run results.
//!
//! The flow through this module is one-directional:
//!
//! ```text
//! PredicateRegistry ──▶ compile ──▶ CheckSet ──▶ run ──▶ CheckSummary
//!                                      │                     │
//!                                    Check              CheckResult
//! ```
//!
//! [`Check`] and [`CheckSet`] are created once by the compiler and reused
//! across runs; [`CheckResult`] and [`CheckSummary`] are created fresh per
//! run and owned by the caller.

mod check;
mod predicate;
mod result;

pub use check::{Check, CheckSet};
pub use predicate::{Predicate, PredicateOutcome, PredicateRegistry};
pub use result::{CheckResult, CheckSummary, RowValues};
