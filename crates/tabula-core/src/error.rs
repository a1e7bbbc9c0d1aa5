//! Compile-time error types for SQL construction.
//!
//! Every failure in this library is a [`SyntaxError`]: a deterministic,
//! synchronous rejection of the input structure. There is no partial-success
//! mode -- a failed build yields no SQL at all -- and nothing is retried,
//! because rebuilding the same structure always reproduces the same failure.

use thiserror::Error;

/// A compile-time SQL construction failure.
///
/// Covers every way a query or DDL build can fail: an unresolved identifier
/// (a column with no owning table, an empty table name), a column without a
/// declared data kind in a CREATE TABLE, a literal value that cannot be
/// rendered for the target dialect, an unsupported autoincrement/type
/// combination, or malformed check-expression text. The message always names
/// the offending column, table, or value.
///
/// # Examples
///
/// ```
/// use tabula_core::SyntaxError;
///
/// let err = SyntaxError::new("column \"id\" has no declared data kind");
/// assert_eq!(err.to_string(), "Syntax error: column \"id\" has no declared data kind");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error: {message}")]
pub struct SyntaxError {
    /// Human-readable description naming the offending node.
    pub message: String,
}

impl SyntaxError {
    /// Creates a new syntax error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A convenience type alias for `Result<T, SyntaxError>`.
pub type BuildResult<T> = Result<T, SyntaxError>;
