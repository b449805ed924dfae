//! The predicate capability and the named-predicate registry.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of one predicate invocation: pass/fail, or an evaluation error.
///
/// The engine treats an `Err` exactly like `Ok(false)` for the row under
/// evaluation; it never aborts the enclosing check or run.
pub type PredicateOutcome = std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>>;

/// A boolean predicate over one row of declared columns.
///
/// The engine invokes [`test`](Predicate::test) once per row with the
/// declared columns' values in declaration order; the slice length always
/// equals the check's declared column count. Implementations must be
/// stateless with respect to rows: the engine gives no ordering guarantee
/// across checks in concurrent mode.
///
/// Any `Fn(&[Value]) -> PredicateOutcome` closure is a predicate.
pub trait Predicate: Send + Sync {
    /// Evaluates the predicate against one row.
    fn test(&self, row: &[Value]) -> PredicateOutcome;
}

impl<F> Predicate for F
where
    F: Fn(&[Value]) -> PredicateOutcome + Send + Sync,
{
    fn test(&self, row: &[Value]) -> PredicateOutcome {
        self(row)
    }
}

/// The table of named predicates that declarations are resolved against.
///
/// The compiler requires every invocation to reference a registered name;
/// registering is the caller's way of exposing Rust functions to the
/// declaration language.
///
/// # Examples
///
/// ```rust
/// use rowguard::core::PredicateRegistry;
///
/// let mut predicates = PredicateRegistry::new();
/// predicates.register_fn("is_positive", |row| {
///     row[0].as_f64().is_some_and(|v| v > 0.0)
/// });
/// assert!(predicates.contains("is_positive"));
/// ```
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> &mut Self {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Registers an infallible predicate: a plain `bool`-returning closure.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.register(name, move |row: &[Value]| -> PredicateOutcome {
            Ok(predicate(row))
        })
    }

    /// Looks up a predicate by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Predicate>> {
        self.predicates.get(name).cloned()
    }

    /// Returns whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_invoke() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("always_true", |_row| true);

        let predicate = registry.get("always_true").unwrap();
        assert_eq!(predicate.test(&[Value::Int(1)]).unwrap(), true);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_fallible_predicate() {
        let mut registry = PredicateRegistry::new();
        registry.register("fails", |_row: &[Value]| -> PredicateOutcome {
            Err("no value".into())
        });

        let predicate = registry.get("fails").unwrap();
        assert!(predicate.test(&[]).is_err());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("p", |_row| true);
        registry.register_fn("p", |_row| false);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("p").unwrap().test(&[]).unwrap(), false);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("b", |_row| true);
        registry.register_fn("a", |_row| true);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
