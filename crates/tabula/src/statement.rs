//! Statement objects: SELECT, INSERT, UPDATE, DELETE.
//!
//! These hold clause state accumulated through method chaining and delegate
//! all SQL generation to the [`QueryBuilder`](crate::builder::QueryBuilder).
//! Building is non-destructive; the same statement can be compiled against
//! any number of dialects.

use crate::builder::QueryBuilder;
use crate::dialect::Dialect;
use crate::expression::Expression;
use crate::predicate::Operand;
use crate::schema::{Column, Table};
use crate::value::Value;
use tabula_core::BuildResult;

/// SQL JOIN kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// CROSS JOIN (no ON condition).
    Cross,
}

impl JoinType {
    /// Returns the SQL keyword for this join kind.
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// One JOIN clause.
#[derive(Debug, Clone)]
pub struct Join {
    /// The joined table.
    pub table: Table,
    /// The join kind.
    pub kind: JoinType,
    /// The ON condition; required for everything but CROSS joins.
    pub on: Option<Expression>,
}

impl Join {
    /// An INNER JOIN with an ON condition.
    pub fn inner(table: Table, on: Expression) -> Self {
        Self {
            table,
            kind: JoinType::Inner,
            on: Some(on),
        }
    }

    /// A LEFT JOIN with an ON condition.
    pub fn left(table: Table, on: Expression) -> Self {
        Self {
            table,
            kind: JoinType::Left,
            on: Some(on),
        }
    }

    /// A CROSS JOIN.
    pub fn cross(table: Table) -> Self {
        Self {
            table,
            kind: JoinType::Cross,
            on: None,
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// The ordered expression; plain column references compile unqualified.
    pub expr: Expression,
    /// Whether to sort descending.
    pub descending: bool,
    /// Whether to put nulls first or last.
    pub nulls_first: Option<bool>,
}

impl OrderBy {
    /// An ascending order term.
    pub fn asc(expr: impl Into<Expression>) -> Self {
        Self {
            expr: expr.into(),
            descending: false,
            nulls_first: None,
        }
    }

    /// A descending order term.
    pub fn desc(expr: impl Into<Expression>) -> Self {
        Self {
            expr: expr.into(),
            descending: true,
            nulls_first: None,
        }
    }

    /// Puts nulls before non-null values.
    #[must_use]
    pub const fn nulls_first(mut self) -> Self {
        self.nulls_first = Some(true);
        self
    }

    /// Puts nulls after non-null values.
    #[must_use]
    pub const fn nulls_last(mut self) -> Self {
        self.nulls_first = Some(false);
        self
    }
}

/// A SELECT statement under construction.
///
/// ```
/// use tabula::prelude::*;
///
/// let users = Table::new("users", vec![Column::new("age", DataKind::Int32)]);
/// let (sql, params) = Select::from(users.clone())
///     .filter(ge(users.column("age").unwrap(), 21))
///     .limit(10)
///     .build(&Dialect::ansi())
///     .unwrap();
/// assert_eq!(sql, "SELECT * FROM users WHERE users.age >= ? LIMIT 10");
/// assert_eq!(params, vec![Value::Int(21)]);
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    pub(crate) items: Vec<Expression>,
    pub(crate) tables: Vec<Table>,
    pub(crate) distinct: bool,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_clause: Option<Expression>,
    pub(crate) group_by: Vec<Expression>,
    pub(crate) having: Option<Expression>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl Select {
    /// Starts a `SELECT *` over the given table.
    pub fn from(table: Table) -> Self {
        Self {
            items: Vec::new(),
            tables: vec![table],
            distinct: false,
            joins: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replaces the select list. An empty list means `*`.
    #[must_use]
    pub fn columns(mut self, items: Vec<Expression>) -> Self {
        self.items = items;
        self
    }

    /// Adds another source table (comma-joined in FROM).
    #[must_use]
    pub fn and_from(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Applies DISTINCT to the select list.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a JOIN clause.
    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn inner_join(self, table: Table, on: Expression) -> Self {
        self.join(Join::inner(table, on))
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: Table, on: Expression) -> Self {
        self.join(Join::left(table, on))
    }

    /// Adds a CROSS JOIN.
    #[must_use]
    pub fn cross_join(self, table: Table) -> Self {
        self.join(Join::cross(table))
    }

    /// Installs a predicate into the WHERE slot. Repeated calls are
    /// AND-combined.
    #[must_use]
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    /// Sets the GROUP BY expressions.
    #[must_use]
    pub fn group_by(mut self, exprs: Vec<Expression>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Installs a predicate into the HAVING slot. Repeated calls are
    /// AND-combined. Whether the tree references aggregates is not checked
    /// here; the target database enforces its own placement rules.
    #[must_use]
    pub fn having(mut self, predicate: Expression) -> Self {
        self.having = Some(match self.having {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    /// Sets the ORDER BY terms.
    #[must_use]
    pub fn order_by(mut self, orders: Vec<OrderBy>) -> Self {
        self.order_by = orders;
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the OFFSET.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Compiles this statement against a dialect.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<(String, Vec<Value>)> {
        QueryBuilder::new(dialect).build_select(self)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum InsertSource {
    Values(Vec<Vec<Expression>>),
    Query(Box<Select>),
}

/// An INSERT statement under construction.
///
/// Rows are added one at a time with [`values`](Insert::values); alternatively
/// [`query`](Insert::query) turns the statement into `INSERT ... SELECT`.
#[derive(Debug, Clone)]
pub struct Insert {
    pub(crate) table: Table,
    pub(crate) columns: Vec<Column>,
    pub(crate) source: InsertSource,
}

impl Insert {
    /// Starts an INSERT into the given table.
    pub fn into(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            source: InsertSource::Values(Vec::new()),
        }
    }

    /// Sets the target column list.
    #[must_use]
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends one VALUES row. Row arity is checked against the column list
    /// at build time.
    #[must_use]
    pub fn values<T: Operand>(mut self, row: Vec<T>) -> Self {
        let row = row.into_iter().map(Operand::into_operand).collect();
        match &mut self.source {
            InsertSource::Values(rows) => rows.push(row),
            InsertSource::Query(_) => self.source = InsertSource::Values(vec![row]),
        }
        self
    }

    /// Inserts the result of a SELECT instead of literal rows.
    #[must_use]
    pub fn query(mut self, query: Select) -> Self {
        self.source = InsertSource::Query(Box::new(query));
        self
    }

    /// Compiles this statement against a dialect.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<(String, Vec<Value>)> {
        QueryBuilder::new(dialect).build_insert(self)
    }
}

/// An UPDATE statement under construction.
#[derive(Debug, Clone)]
pub struct Update {
    pub(crate) table: Table,
    pub(crate) assignments: Vec<(Column, Expression)>,
    pub(crate) where_clause: Option<Expression>,
}

impl Update {
    /// Starts an UPDATE of the given table.
    pub fn table(table: Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            where_clause: None,
        }
    }

    /// Appends one `column = value` assignment.
    #[must_use]
    pub fn set(mut self, column: Column, value: impl Operand) -> Self {
        self.assignments.push((column, value.into_operand()));
        self
    }

    /// Installs a predicate into the WHERE slot. Repeated calls are
    /// AND-combined.
    #[must_use]
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    /// Compiles this statement against a dialect.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<(String, Vec<Value>)> {
        QueryBuilder::new(dialect).build_update(self)
    }
}

/// A DELETE statement under construction.
#[derive(Debug, Clone)]
pub struct Delete {
    pub(crate) table: Table,
    pub(crate) where_clause: Option<Expression>,
}

impl Delete {
    /// Starts a DELETE from the given table.
    pub fn from(table: Table) -> Self {
        Self {
            table,
            where_clause: None,
        }
    }

    /// Installs a predicate into the WHERE slot. Repeated calls are
    /// AND-combined.
    #[must_use]
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    /// Compiles this statement against a dialect.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<(String, Vec<Value>)> {
        QueryBuilder::new(dialect).build_delete(self)
    }
}
