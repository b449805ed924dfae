//! Error types for rowguard.

use thiserror::Error;

/// Result type for rowguard operations.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors surfaced by declaration compilation, name-scoped lookups, and
/// report serialization.
///
/// Data-quality conditions are deliberately absent here: missing columns,
/// failing predicates, and predicate evaluation errors are all recorded on
/// the [`CheckResult`](crate::core::CheckResult) instead, so a single run
/// always yields a complete report across all checks.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The declaration block failed to parse.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line in the declaration text.
        line: usize,
        /// What the parser expected or found.
        message: String,
    },

    /// A declaration's display name is not a string literal.
    #[error("declaration {declaration}: check name must be a string literal, found `{found}`")]
    NameNotLiteral {
        /// 1-based position of the declaration in its block.
        declaration: usize,
        /// Rendering of the offending name expression.
        found: String,
    },

    /// A declaration's body is an inline function instead of a named
    /// predicate invocation.
    #[error("declaration {declaration} ({name:?}): predicate must be a named function, not an inline function")]
    AnonymousPredicate {
        /// 1-based position of the declaration in its block.
        declaration: usize,
        /// The declaration's display name.
        name: String,
    },

    /// A declaration's body is not a predicate invocation at all.
    #[error("declaration {declaration} ({name:?}): expected a predicate invocation, found `{found}`")]
    NotAnInvocation {
        /// 1-based position of the declaration in its block.
        declaration: usize,
        /// The declaration's display name.
        name: String,
        /// Rendering of the offending body expression.
        found: String,
    },

    /// A declaration invokes a predicate that is not registered.
    #[error("declaration {declaration} ({name:?}): unknown predicate `{predicate}`")]
    UnknownPredicate {
        /// 1-based position of the declaration in its block.
        declaration: usize,
        /// The declaration's display name.
        name: String,
        /// The unresolved predicate name.
        predicate: String,
    },

    /// A lookup referenced a check name absent from the checkset or summary.
    #[error("unknown check `{name}`")]
    UnknownCheck {
        /// The name that failed to resolve.
        name: String,
    },

    /// A report could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_identify_declarations() {
        let err = GuardError::NameNotLiteral {
            declaration: 3,
            found: "positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "declaration 3: check name must be a string literal, found `positive`"
        );

        let err = GuardError::UnknownPredicate {
            declaration: 1,
            name: "positive".into(),
            predicate: "is_positiv".into(),
        };
        assert!(err.to_string().contains("unknown predicate `is_positiv`"));
        assert!(err.to_string().contains("declaration 1"));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = GuardError::Parse {
            line: 4,
            message: "unexpected token )".into(),
        };
        assert_eq!(err.to_string(), "parse error at line 4: unexpected token )");
    }
}
