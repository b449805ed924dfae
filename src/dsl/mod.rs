//! The check-declaration compiler.
//!
//! Declarations are written in a small textual language, one check per
//! declaration:
//!
//! ```text
//! # name          predicate invocation
//! "positive":     is_positive(a);
//! "a over b":     gt(a, b);
//! "scaled in k":  in_range(scaled(a, b), k)
//! ```
//!
//! The display name must be a string literal and the body an invocation of
//! a predicate registered in a [`PredicateRegistry`]. Bare identifiers in
//! argument position are column references; arguments may be nested calls
//! wrapping column references, and the compiler discovers a check's
//! columns by a depth-first traversal of the whole argument tree,
//! deduplicated in first-occurrence order. At run time the predicate
//! receives exactly those columns' values, in that order.
//!
//! Compilation is fail-fast: the first offending declaration aborts the
//! whole block with an error identifying it. Resolving columns from the
//! declaration structure rather than from the predicate itself lets the
//! engine fetch exactly the columns each check needs without invoking user
//! code, and catches malformed declarations before any data is touched.

mod ast;
mod lexer;
mod parser;

pub use ast::{Decl, Expr};
pub use lexer::{Lexer, Token};
pub use parser::Parser;

use crate::core::{Check, CheckSet, PredicateRegistry};
use crate::error::{GuardError, Result};
use tracing::debug;

/// Compiles a declaration block into an executable [`CheckSet`].
///
/// # Examples
///
/// ```rust
/// use rowguard::core::PredicateRegistry;
/// use rowguard::dsl::compile;
///
/// let mut predicates = PredicateRegistry::new();
/// predicates.register_fn("is_positive", |row| {
///     row[0].as_f64().is_some_and(|v| v > 0.0)
/// });
///
/// let checks = compile("demo", r#""positive": is_positive(a)"#, &predicates)?;
/// assert_eq!(checks.check_names(), vec!["positive"]);
/// assert_eq!(checks.check_columns("positive")?, &["a"]);
/// # Ok::<(), rowguard::error::GuardError>(())
/// ```
///
/// # Errors
///
/// Fails on the first syntax error, non-literal check name, non-invocation
/// or lambda body, or unresolved predicate name. Compilation of the block
/// is not per-declaration recoverable.
pub fn compile(
    name: &str,
    declarations: &str,
    predicates: &PredicateRegistry,
) -> Result<CheckSet> {
    let decls = Parser::parse(declarations)?;
    let mut checks = Vec::with_capacity(decls.len());
    for (index, decl) in decls.iter().enumerate() {
        checks.push(compile_decl(index + 1, decl, predicates)?);
    }
    debug!(
        checkset.name = %name,
        checkset.checks = checks.len(),
        "Compiled checkset"
    );
    Ok(CheckSet::new(name, checks))
}

fn compile_decl(position: usize, decl: &Decl, predicates: &PredicateRegistry) -> Result<Check> {
    let name = match &decl.name {
        Expr::Str(name) => name.clone(),
        other => {
            return Err(GuardError::NameNotLiteral {
                declaration: position,
                found: other.describe(),
            })
        }
    };

    let (function, args) = match &decl.body {
        Expr::Call { function, args } => (function, args),
        Expr::Lambda { .. } => {
            return Err(GuardError::AnonymousPredicate {
                declaration: position,
                name,
            })
        }
        other => {
            return Err(GuardError::NotAnInvocation {
                declaration: position,
                name,
                found: other.describe(),
            })
        }
    };

    let predicate = predicates
        .get(function)
        .ok_or_else(|| GuardError::UnknownPredicate {
            declaration: position,
            name: name.clone(),
            predicate: function.clone(),
        })?;

    let mut columns = Vec::new();
    for arg in args {
        arg.collect_columns(&mut columns);
    }
    debug!(
        check.name = %name,
        check.predicate = %function,
        check.columns = ?columns,
        "Compiled check"
    );

    Ok(Check::new(name, function.clone(), predicate, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn registry() -> PredicateRegistry {
        let mut predicates = PredicateRegistry::new();
        predicates.register_fn("is_positive", |row: &[Value]| {
            row[0].as_f64().is_some_and(|v| v > 0.0)
        });
        predicates.register_fn("gt", |row: &[Value]| {
            match (row[0].as_f64(), row[1].as_f64()) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            }
        });
        predicates
    }

    #[test]
    fn test_compile_preserves_declaration_order() {
        let checks = compile(
            "demo",
            r#"
            "second over first": gt(b, a);
            "positive": is_positive(a)
            "#,
            &registry(),
        )
        .unwrap();
        assert_eq!(checks.name(), "demo");
        assert_eq!(checks.check_names(), vec!["second over first", "positive"]);
        assert_eq!(checks.checks()[0].predicate_name(), "gt");
    }

    #[test]
    fn test_columns_from_nested_arguments() {
        let checks = compile(
            "demo",
            r#""nested": gt(b, gt(a, gt(b, c)))"#,
            &registry(),
        )
        .unwrap();
        assert_eq!(checks.check_columns("nested").unwrap(), &["b", "a", "c"]);
    }

    #[test]
    fn test_name_must_be_string_literal() {
        let err = compile("demo", "positive: is_positive(a)", &registry()).unwrap_err();
        assert!(matches!(
            err,
            GuardError::NameNotLiteral { declaration: 1, .. }
        ));
    }

    #[test]
    fn test_lambda_body_rejected() {
        let err = compile("demo", r#""inline": |x| gt(x, x)"#, &registry()).unwrap_err();
        assert!(
            matches!(err, GuardError::AnonymousPredicate { declaration: 1, name } if name == "inline")
        );
    }

    #[test]
    fn test_non_invocation_body_rejected() {
        let err = compile("demo", r#""bare": a"#, &registry()).unwrap_err();
        assert!(matches!(err, GuardError::NotAnInvocation { .. }));
    }

    #[test]
    fn test_unknown_predicate_rejected() {
        let err = compile("demo", r#""typo": is_positiv(a)"#, &registry()).unwrap_err();
        assert!(
            matches!(err, GuardError::UnknownPredicate { predicate, .. } if predicate == "is_positiv")
        );
    }

    #[test]
    fn test_fail_fast_on_later_declaration() {
        let err = compile(
            "demo",
            r#"
            "ok": is_positive(a);
            "bad": |x| gt(x, x)
            "#,
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GuardError::AnonymousPredicate { declaration: 2, .. }
        ));
    }
}
