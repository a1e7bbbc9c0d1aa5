//! Constructors for common SQL functions.
//!
//! Each constructor returns an [`Expression`] node that renders as
//! `NAME(args...)`. Arguments are anything convertible to an expression, so
//! columns and literals mix freely:
//!
//! ```
//! use tabula::expression::functions::{lcase, round};
//! use tabula::expression::Expression;
//!
//! let lowered = lcase(Expression::value("TEXT"));
//! let rounded = round(Expression::value(2.57), 1);
//! ```

use super::{AggregateFunc, Expression};

// ── Comparison ─────────────────────────────────────────────────────────

/// COALESCE(expr1, expr2, ...) - the first non-NULL argument.
pub fn coalesce(args: Vec<Expression>) -> Expression {
    Expression::function("COALESCE", args)
}

/// GREATEST(expr1, expr2, ...) - the largest argument.
pub fn greatest(args: Vec<Expression>) -> Expression {
    Expression::function("GREATEST", args)
}

/// LEAST(expr1, expr2, ...) - the smallest argument.
pub fn least(args: Vec<Expression>) -> Expression {
    Expression::function("LEAST", args)
}

/// NULLIF(expr1, expr2) - NULL if the arguments are equal, otherwise expr1.
pub fn nullif(expr1: impl Into<Expression>, expr2: impl Into<Expression>) -> Expression {
    Expression::function("NULLIF", vec![expr1.into(), expr2.into()])
}

// ── Text ───────────────────────────────────────────────────────────────

/// CONCAT(expr1, expr2, ...) - concatenates strings.
pub fn concat(args: Vec<Expression>) -> Expression {
    Expression::function("CONCAT", args)
}

/// LOWER(str) - converts to lowercase.
pub fn lower(expr: impl Into<Expression>) -> Expression {
    Expression::function("LOWER", vec![expr.into()])
}

/// UPPER(str) - converts to uppercase.
pub fn upper(expr: impl Into<Expression>) -> Expression {
    Expression::function("UPPER", vec![expr.into()])
}

/// LCASE(str) - lowercase, the legacy spelling some dialects prefer.
pub fn lcase(expr: impl Into<Expression>) -> Expression {
    Expression::function("LCASE", vec![expr.into()])
}

/// UCASE(str) - uppercase, the legacy spelling some dialects prefer.
pub fn ucase(expr: impl Into<Expression>) -> Expression {
    Expression::function("UCASE", vec![expr.into()])
}

/// LENGTH(str) - string length.
pub fn length(expr: impl Into<Expression>) -> Expression {
    Expression::function("LENGTH", vec![expr.into()])
}

/// TRIM(str) - removes leading and trailing whitespace.
pub fn trim(expr: impl Into<Expression>) -> Expression {
    Expression::function("TRIM", vec![expr.into()])
}

/// LTRIM(str) - removes leading whitespace.
pub fn ltrim(expr: impl Into<Expression>) -> Expression {
    Expression::function("LTRIM", vec![expr.into()])
}

/// RTRIM(str) - removes trailing whitespace.
pub fn rtrim(expr: impl Into<Expression>) -> Expression {
    Expression::function("RTRIM", vec![expr.into()])
}

/// REPLACE(str, from, to) - substring replacement.
pub fn replace(
    expr: impl Into<Expression>,
    from: impl Into<Expression>,
    to: impl Into<Expression>,
) -> Expression {
    Expression::function("REPLACE", vec![expr.into(), from.into(), to.into()])
}

/// SUBSTR(str, start, count) - substring extraction.
pub fn substr(expr: impl Into<Expression>, start: i64, count: i64) -> Expression {
    Expression::function(
        "SUBSTR",
        vec![
            expr.into(),
            Expression::value(start),
            Expression::value(count),
        ],
    )
}

/// LEFT(str, n) - the leftmost n characters.
pub fn left(expr: impl Into<Expression>, n: i64) -> Expression {
    Expression::function("LEFT", vec![expr.into(), Expression::value(n)])
}

/// RIGHT(str, n) - the rightmost n characters.
pub fn right(expr: impl Into<Expression>, n: i64) -> Expression {
    Expression::function("RIGHT", vec![expr.into(), Expression::value(n)])
}

// ── Math ───────────────────────────────────────────────────────────────

/// ABS(expr) - absolute value.
pub fn abs(expr: impl Into<Expression>) -> Expression {
    Expression::function("ABS", vec![expr.into()])
}

/// CEIL(expr) - round up.
pub fn ceil(expr: impl Into<Expression>) -> Expression {
    Expression::function("CEIL", vec![expr.into()])
}

/// FLOOR(expr) - round down.
pub fn floor(expr: impl Into<Expression>) -> Expression {
    Expression::function("FLOOR", vec![expr.into()])
}

/// ROUND(expr, digits) - round to the given number of digits.
pub fn round(expr: impl Into<Expression>, digits: i64) -> Expression {
    Expression::function("ROUND", vec![expr.into(), Expression::value(digits)])
}

/// SQRT(expr) - square root.
pub fn sqrt(expr: impl Into<Expression>) -> Expression {
    Expression::function("SQRT", vec![expr.into()])
}

/// POWER(base, exponent).
pub fn power(base: impl Into<Expression>, exponent: impl Into<Expression>) -> Expression {
    Expression::function("POWER", vec![base.into(), exponent.into()])
}

/// MOD(dividend, divisor).
pub fn modulo(dividend: impl Into<Expression>, divisor: impl Into<Expression>) -> Expression {
    Expression::function("MOD", vec![dividend.into(), divisor.into()])
}

// ── Date/time ──────────────────────────────────────────────────────────

/// NOW() - the current timestamp. Zero-arg calls keep their parentheses.
pub fn now() -> Expression {
    Expression::function("NOW", vec![])
}

// ── Aggregates ─────────────────────────────────────────────────────────

/// COUNT(expr).
pub fn count(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate(AggregateFunc::Count, expr.into())
}

/// COUNT(*).
pub fn count_star() -> Expression {
    Expression::aggregate(AggregateFunc::Count, Expression::star())
}

/// COUNT(DISTINCT expr).
pub fn count_distinct(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate_distinct(AggregateFunc::Count, expr.into())
}

/// SUM(expr).
pub fn sum(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate(AggregateFunc::Sum, expr.into())
}

/// SUM(DISTINCT expr).
pub fn sum_distinct(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate_distinct(AggregateFunc::Sum, expr.into())
}

/// AVG(expr).
pub fn avg(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate(AggregateFunc::Avg, expr.into())
}

/// MIN(expr).
pub fn min(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate(AggregateFunc::Min, expr.into())
}

/// MAX(expr).
pub fn max(expr: impl Into<Expression>) -> Expression {
    Expression::aggregate(AggregateFunc::Max, expr.into())
}
