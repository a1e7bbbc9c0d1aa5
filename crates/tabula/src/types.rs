//! Abstract data kinds.
//!
//! [`DataKind`] names a column's storage type independently of any dialect.
//! The mapping from a kind to a concrete SQL type keyword lives in
//! [`Dialect`](crate::dialect::Dialect), so the same schema compiles against
//! every supported backend.

use crate::value::Value;

/// The abstract type of a column, resolved to a dialect-specific SQL type
/// keyword at compile time.
///
/// Length and precision are not part of the kind; they are declared on the
/// [`Column`](crate::schema::Column) and appended to the keyword by DDL
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DataKind {
    /// Boolean (true/false).
    Bool,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Single-precision floating point.
    Float,
    /// Double-precision floating point.
    Double,
    /// Fixed-length string.
    Char,
    /// Variable-length string with a maximum length.
    Varchar,
    /// Unlimited-length text.
    Text,
    /// Date without time.
    Date,
    /// Time without date.
    Time,
    /// Date and time.
    Timestamp,
    /// UUID.
    Uuid,
    /// Raw binary data.
    Binary,
}

impl DataKind {
    /// Classifies a runtime value, or `None` for `Value::Null`.
    pub const fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Int(_) => Some(Self::Int64),
            Value::Float(_) => Some(Self::Double),
            Value::String(_) => Some(Self::Text),
            Value::Bytes(_) => Some(Self::Binary),
            Value::Date(_) => Some(Self::Date),
            Value::Time(_) => Some(Self::Time),
            Value::DateTime(_) => Some(Self::Timestamp),
            Value::Uuid(_) => Some(Self::Uuid),
        }
    }

    /// Returns `true` for the integer kinds.
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64)
    }
}
