//! # tabula
//!
//! A database-agnostic SQL query construction library. Callers describe
//! tables, columns, and query operations as typed in-memory objects; tabula
//! compiles them into dialect-correct SQL text plus an ordered list of bound
//! parameter values, and hands both to whatever database driver executes
//! them. This crate never opens a connection or reads a response.
//!
//! ## Architecture
//!
//! Queries are built lazily. A [`Select`](statement::Select) (or
//! [`Insert`](statement::Insert), [`Update`](statement::Update),
//! [`Delete`](statement::Delete)) accumulates clause state through method
//! chaining without producing any SQL. Only when `.build(&dialect)` is called
//! does the [`QueryBuilder`](builder::QueryBuilder) walk the clause tree,
//! consulting the [`Dialect`](dialect::Dialect) for identifier quoting,
//! placeholder style, and type keywords, and emit the final
//! `(sql, parameters)` pair. Compilation is a pure, synchronous tree walk:
//! every failure is a [`SyntaxError`] returned to the caller, and a failed
//! build yields no partial SQL.
//!
//! ## Module Overview
//!
//! - [`value`] - The [`Value`](value::Value) literal enum
//! - [`types`] - Abstract [`DataKind`](types::DataKind)s mapped to SQL types
//! - [`dialect`] - Identifier quoting, placeholders, and type keywords
//! - [`schema`] - [`Table`](schema::Table) and [`Column`](schema::Column)
//! - [`expression`] - The [`Expression`](expression::Expression) node model
//! - [`predicate`] - Typed comparison and boolean combinator constructors
//! - [`statement`] - SELECT / INSERT / UPDATE / DELETE clause holders
//! - [`builder`] - The [`QueryBuilder`](builder::QueryBuilder) compiler
//!
//! ## Example
//!
//! ```
//! use tabula::prelude::*;
//!
//! let users = Table::new(
//!     "users",
//!     vec![
//!         Column::new("id", DataKind::Int64).primary_key().not_null(),
//!         Column::new("name", DataKind::Varchar).length(100),
//!         Column::new("age", DataKind::Int32),
//!     ],
//! );
//!
//! let query = Select::from(users.clone())
//!     .columns(vec![users.column("name").unwrap().into()])
//!     .filter(gt(users.column("age").unwrap(), 25))
//!     .order_by(vec![OrderBy::asc(users.column("name").unwrap())]);
//!
//! let (sql, params) = query.build(&Dialect::postgres()).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT \"users\".\"name\" FROM \"users\" WHERE \"users\".\"age\" > $1 ORDER BY \"name\" ASC"
//! );
//! assert_eq!(params, vec![Value::Int(25)]);
//! ```

// These clippy lints are intentionally allowed for this crate:
// - struct_excessive_bools: Column mirrors SQL DDL flags which are booleans
// - too_many_lines: the compiler methods are inherently large due to many match arms
// - result_large_err: SyntaxError is the library error type and is used consistently
// - format_push_string: format! with push_str is clearer than write! for SQL assembly
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::result_large_err)]
#![allow(clippy::format_push_string)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]

pub mod builder;
pub mod dialect;
pub mod expression;
pub mod predicate;
pub mod schema;
pub mod statement;
pub mod types;
pub mod value;

pub use tabula_core::{BuildResult, SyntaxError};

pub use builder::QueryBuilder;
pub use dialect::{Dialect, LiteralPolicy, PlaceholderStyle, QuotePair};
pub use expression::{AggregateFunc, BinaryOp, Expression, UnaryOp};
pub use schema::{Column, ForeignKey, Table};
pub use statement::{Delete, Insert, Join, JoinType, OrderBy, Select, Update};
pub use types::DataKind;
pub use value::Value;

/// Commonly used items, importable in one line.
pub mod prelude {
    pub use crate::dialect::{Dialect, LiteralPolicy, PlaceholderStyle, QuotePair};
    pub use crate::expression::functions::*;
    pub use crate::expression::{AggregateFunc, Expression};
    pub use crate::predicate::*;
    pub use crate::schema::{Column, ForeignKey, Table};
    pub use crate::statement::{Delete, Insert, Join, JoinType, OrderBy, Select, Update};
    pub use crate::types::DataKind;
    pub use crate::value::Value;
    pub use crate::{BuildResult, QueryBuilder, SyntaxError};
}
