//! Compiled checks and checksets.

use crate::core::predicate::Predicate;
use crate::error::{GuardError, Result};
use std::fmt;
use std::sync::Arc;

/// A single named validation rule bound to an ordered list of columns.
///
/// Produced by [`compile`](crate::dsl::compile); immutable afterwards and
/// reusable across any number of runs. The column list is already
/// deduplicated in first-occurrence order, so the engine can materialize
/// exactly the columns the predicate needs.
#[derive(Clone)]
pub struct Check {
    name: String,
    predicate_name: String,
    predicate: Arc<dyn Predicate>,
    columns: Vec<String>,
}

impl Check {
    pub(crate) fn new(
        name: impl Into<String>,
        predicate_name: impl Into<String>,
        predicate: Arc<dyn Predicate>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            predicate_name: predicate_name.into(),
            predicate,
            columns,
        }
    }

    /// The display name this check was declared with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered name of the predicate this check invokes.
    pub fn predicate_name(&self) -> &str {
        &self.predicate_name
    }

    /// The predicate this check invokes.
    pub fn predicate(&self) -> &dyn Predicate {
        self.predicate.as_ref()
    }

    /// The declared columns, in first-occurrence order, deduplicated.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("predicate", &self.predicate_name)
            .field("columns", &self.columns)
            .finish()
    }
}

/// A named, ordered, immutable collection of [`Check`]s.
///
/// Checks keep their declaration order; the sequential execution mode
/// evaluates them in exactly this order.
#[derive(Debug, Clone)]
pub struct CheckSet {
    name: String,
    checks: Vec<Check>,
}

impl CheckSet {
    pub(crate) fn new(name: impl Into<String>, checks: Vec<Check>) -> Self {
        Self {
            name: name.into(),
            checks,
        }
    }

    /// The checkset's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The checks, in declaration order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns whether the checkset has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The first check declared under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|check| check.name() == name)
    }

    /// Check names in declaration order.
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(Check::name).collect()
    }

    /// Declared columns of the named check.
    ///
    /// Unknown names are a caller programming error and fail loudly with
    /// [`GuardError::UnknownCheck`].
    pub fn check_columns(&self, name: &str) -> Result<&[String]> {
        self.get(name)
            .map(Check::columns)
            .ok_or_else(|| GuardError::UnknownCheck { name: name.into() })
    }
}
