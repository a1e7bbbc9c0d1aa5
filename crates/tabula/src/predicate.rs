//! Predicate construction: typed comparisons and boolean combinators.
//!
//! The constructors here build the WHERE/HAVING trees. Each accepts any
//! pairing of operands through the [`Operand`] capability -- columns,
//! expressions, literal Rust values, or whole subqueries -- so one generic
//! implementation covers every combination instead of one function per type
//! pair.
//!
//! There is no structural difference between a filter tree and a having
//! tree; the same [`Expression`] is installed into whichever clause slot it
//! is given to. Operand kind compatibility is not checked at construction:
//! a nonsensical pairing compiles and is rejected by the target database,
//! which matches how the supported dialects report their own type errors.
//!
//! # Examples
//!
//! ```
//! use tabula::prelude::*;
//!
//! let users = Table::new("users", vec![
//!     Column::new("age", DataKind::Int32),
//!     Column::new("name", DataKind::Varchar),
//! ]);
//!
//! let grown_ups = and(
//!     ge(users.column("age").unwrap(), 18),
//!     like(users.column("name").unwrap(), "A%"),
//! );
//! let (sql, params) = Select::from(users).filter(grown_ups).build(&Dialect::ansi()).unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE users.age >= ? AND users.name LIKE ?");
//! assert_eq!(params.len(), 2);
//! ```

use crate::expression::{BinaryOp, Expression, UnaryOp};
use crate::schema::Column;
use crate::statement::Select;
use crate::value::Value;

/// The capability of being used as a SQL operand.
///
/// Implemented for expressions, columns, subqueries, [`Value`], and the
/// native Rust literal types. This is the single generic surface that
/// replaces per-type-pair operator overloads.
pub trait Operand {
    /// Converts the operand into an expression node.
    fn into_operand(self) -> Expression;
}

impl Operand for Expression {
    fn into_operand(self) -> Expression {
        self
    }
}

impl Operand for Column {
    fn into_operand(self) -> Expression {
        Expression::Column(self)
    }
}

impl Operand for &Column {
    fn into_operand(self) -> Expression {
        Expression::Column(self.clone())
    }
}

impl Operand for Value {
    fn into_operand(self) -> Expression {
        Expression::Literal(self)
    }
}

impl Operand for Select {
    fn into_operand(self) -> Expression {
        Expression::Subquery(Box::new(self))
    }
}

macro_rules! impl_literal_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl Operand for $t {
                fn into_operand(self) -> Expression {
                    Expression::Literal(Value::from(self))
                }
            }
        )*
    };
}

impl_literal_operand!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    &str,
    String,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    uuid::Uuid,
);

fn compare(op: BinaryOp, left: impl Operand, right: impl Operand) -> Expression {
    Expression::Binary {
        op,
        left: Box::new(left.into_operand()),
        right: Box::new(right.into_operand()),
    }
}

/// `left = right`.
pub fn eq(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::Eq, left, right)
}

/// `left <> right`.
pub fn ne(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::NotEq, left, right)
}

/// `left < right`.
pub fn lt(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::Lt, left, right)
}

/// `left <= right`.
pub fn le(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::LtEq, left, right)
}

/// `left > right`.
pub fn gt(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::Gt, left, right)
}

/// `left >= right`.
pub fn ge(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::GtEq, left, right)
}

/// `left LIKE right`.
pub fn like(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::Like, left, right)
}

/// `left NOT LIKE right`.
pub fn not_like(left: impl Operand, right: impl Operand) -> Expression {
    compare(BinaryOp::NotLike, left, right)
}

/// `left AND right`; nested ANDs flatten into one combinator.
pub fn and(left: impl Operand, right: impl Operand) -> Expression {
    left.into_operand() & right.into_operand()
}

/// `left OR right`; nested ORs flatten into one combinator.
pub fn or(left: impl Operand, right: impl Operand) -> Expression {
    left.into_operand() | right.into_operand()
}

/// `NOT operand`; a double negation cancels.
pub fn not(operand: impl Operand) -> Expression {
    !operand.into_operand()
}

/// `operand IS NULL`.
pub fn is_null(operand: impl Operand) -> Expression {
    Expression::Unary {
        op: UnaryOp::IsNull,
        expr: Box::new(operand.into_operand()),
    }
}

/// `operand IS NOT NULL`.
pub fn is_not_null(operand: impl Operand) -> Expression {
    Expression::Unary {
        op: UnaryOp::IsNotNull,
        expr: Box::new(operand.into_operand()),
    }
}

/// `operand IN (items...)`.
pub fn in_list<T: Operand>(operand: impl Operand, list: Vec<T>) -> Expression {
    Expression::In {
        expr: Box::new(operand.into_operand()),
        list: list.into_iter().map(Operand::into_operand).collect(),
        negated: false,
    }
}

/// `operand NOT IN (items...)`.
pub fn not_in_list<T: Operand>(operand: impl Operand, list: Vec<T>) -> Expression {
    Expression::In {
        expr: Box::new(operand.into_operand()),
        list: list.into_iter().map(Operand::into_operand).collect(),
        negated: true,
    }
}

/// `operand IN (SELECT ...)`.
pub fn in_query(operand: impl Operand, query: Select) -> Expression {
    Expression::InSubquery {
        expr: Box::new(operand.into_operand()),
        query: Box::new(query),
        negated: false,
    }
}

/// `operand NOT IN (SELECT ...)`.
pub fn not_in_query(operand: impl Operand, query: Select) -> Expression {
    Expression::InSubquery {
        expr: Box::new(operand.into_operand()),
        query: Box::new(query),
        negated: true,
    }
}

/// `operand BETWEEN low AND high`.
pub fn between(operand: impl Operand, low: impl Operand, high: impl Operand) -> Expression {
    Expression::Between {
        expr: Box::new(operand.into_operand()),
        low: Box::new(low.into_operand()),
        high: Box::new(high.into_operand()),
        negated: false,
    }
}

/// `operand NOT BETWEEN low AND high`.
pub fn not_between(operand: impl Operand, low: impl Operand, high: impl Operand) -> Expression {
    Expression::Between {
        expr: Box::new(operand.into_operand()),
        low: Box::new(low.into_operand()),
        high: Box::new(high.into_operand()),
        negated: true,
    }
}

/// `EXISTS (SELECT ...)`.
pub fn exists(query: Select) -> Expression {
    Expression::Exists {
        query: Box::new(query),
        negated: false,
    }
}

/// `NOT EXISTS (SELECT ...)`.
pub fn not_exists(query: Select) -> Expression {
    Expression::Exists {
        query: Box::new(query),
        negated: true,
    }
}
