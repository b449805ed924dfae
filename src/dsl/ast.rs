//! Declaration AST produced by the parser.

/// An expression in a check declaration.
///
/// The AST only captures syntactic structure; whether a declaration's name
/// is a string literal or its body a resolvable invocation is the
/// compiler's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A string literal, e.g. `"positive"`.
    Str(String),
    /// A numeric literal.
    Number(f64),
    /// A bare identifier in expression position: a column reference.
    Column(String),
    /// A function invocation, possibly nested, e.g. `gt(abs(a), b)`.
    Call {
        /// The invoked function's name.
        function: String,
        /// Argument expressions, in source order.
        args: Vec<Expr>,
    },
    /// An inline function, e.g. `|x, y| gt(x, y)`. Parsed so the compiler
    /// can reject it with a precise error rather than a syntax error.
    Lambda {
        /// Parameter names.
        params: Vec<String>,
        /// The lambda body.
        body: Box<Expr>,
    },
}

impl Expr {
    /// Short rendering used in compile errors.
    pub fn describe(&self) -> String {
        match self {
            Expr::Str(s) => format!("{s:?}"),
            Expr::Number(n) => n.to_string(),
            Expr::Column(name) => name.clone(),
            Expr::Call { function, .. } => format!("{function}(..)"),
            Expr::Lambda { .. } => "|..| ..".to_string(),
        }
    }

    /// Collects every column reference in this subtree depth-first into
    /// `out`, deduplicating while preserving first-occurrence order.
    pub fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            Expr::Column(name) => {
                if !out.iter().any(|seen| seen == name) {
                    out.push(name.clone());
                }
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
            Expr::Lambda { body, .. } => body.collect_columns(out),
            Expr::Str(_) | Expr::Number(_) => {}
        }
    }
}

/// One parsed declaration: a display-name expression and a body
/// expression, both still unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    /// The name expression left of the `:`.
    pub name: Expr,
    /// The body expression right of the `:`.
    pub body: Expr,
}
