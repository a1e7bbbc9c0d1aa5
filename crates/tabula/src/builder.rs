//! The SQL compiler.
//!
//! [`QueryBuilder`] walks statement clause trees and expression nodes and
//! emits dialect-adapted SQL text plus the ordered bound-parameter list.
//! Compilation is all-or-nothing: any unresolved identifier, unsupported
//! literal, or missing dialect capability aborts the build with a
//! [`SyntaxError`] and no partial SQL is returned.
//!
//! The parameter accumulator is local to one build call and threaded through
//! the whole walk, so placeholder numbering stays correct across nested
//! subqueries.

use crate::dialect::{Dialect, LiteralPolicy};
use crate::expression::{Expression, UnaryOp};
use crate::schema::Table;
use crate::statement::{Delete, Insert, InsertSource, OrderBy, Select, Update};
use crate::value::Value;
use tabula_core::{BuildResult, SyntaxError};

/// Compiles statements and expressions against one dialect.
///
/// The builder borrows its dialect and holds no other state; it can be
/// created per call or reused freely across threads.
pub struct QueryBuilder<'a> {
    dialect: &'a Dialect,
}

impl<'a> QueryBuilder<'a> {
    /// Creates a builder for the given dialect.
    pub const fn new(dialect: &'a Dialect) -> Self {
        Self { dialect }
    }

    /// Compiles a SELECT statement into SQL and parameters.
    pub fn build_select(&self, query: &Select) -> BuildResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let sql = self.build_select_into(query, &mut params)?;
        tracing::debug!(
            dialect = self.dialect.name,
            parameters = params.len(),
            "built SELECT statement"
        );
        Ok((sql, params))
    }

    /// Compiles a SELECT into an existing parameter accumulator. Used for
    /// the top-level statement and for every nested subquery, so placeholder
    /// indices number one sequence across the whole build.
    fn build_select_into(&self, query: &Select, params: &mut Vec<Value>) -> BuildResult<String> {
        let mut sql = String::from("SELECT ");

        if query.distinct {
            sql.push_str("DISTINCT ");
        }

        // Select list
        if query.items.is_empty() {
            sql.push('*');
        } else {
            let mut items = Vec::with_capacity(query.items.len());
            for item in &query.items {
                items.push(self.build_expression(item, params)?);
            }
            sql.push_str(&items.join(", "));
        }

        // FROM
        if query.tables.is_empty() {
            return Err(SyntaxError::new("SELECT has no source table"));
        }
        let mut tables = Vec::with_capacity(query.tables.len());
        for table in &query.tables {
            tables.push(table.build(self.dialect)?);
        }
        sql.push_str(" FROM ");
        sql.push_str(&tables.join(", "));

        // JOINs
        for join in &query.joins {
            sql.push(' ');
            sql.push_str(join.kind.sql_keyword());
            sql.push(' ');
            sql.push_str(&join.table.build(self.dialect)?);
            match (&join.on, join.kind) {
                (Some(_), crate::statement::JoinType::Cross) => {
                    return Err(SyntaxError::new(format!(
                        "CROSS JOIN with table \"{}\" cannot carry an ON condition",
                        join.table.name()
                    )));
                }
                (Some(on), _) => {
                    sql.push_str(" ON ");
                    sql.push_str(&self.build_expression(on, params)?);
                }
                (None, crate::statement::JoinType::Cross) => {}
                (None, kind) => {
                    return Err(SyntaxError::new(format!(
                        "{} with table \"{}\" requires an ON condition",
                        kind.sql_keyword(),
                        join.table.name()
                    )));
                }
            }
        }

        // WHERE
        if let Some(where_clause) = &query.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.build_expression(where_clause, params)?);
        }

        // GROUP BY
        if !query.group_by.is_empty() {
            let mut keys = Vec::with_capacity(query.group_by.len());
            for key in &query.group_by {
                keys.push(self.build_expression(key, params)?);
            }
            sql.push_str(" GROUP BY ");
            sql.push_str(&keys.join(", "));
        }

        // HAVING
        if let Some(having) = &query.having {
            sql.push_str(" HAVING ");
            sql.push_str(&self.build_expression(having, params)?);
        }

        // ORDER BY
        if !query.order_by.is_empty() {
            let mut orders = Vec::with_capacity(query.order_by.len());
            for order in &query.order_by {
                orders.push(self.build_order_term(order, params)?);
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }

        // LIMIT / OFFSET
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(sql)
    }

    fn build_order_term(&self, order: &OrderBy, params: &mut Vec<Value>) -> BuildResult<String> {
        // Plain column references are emitted unqualified in ORDER BY lists.
        let mut sql = match &order.expr {
            Expression::Column(column) => column.build_index(self.dialect),
            other => self.build_expression(other, params)?,
        };
        sql.push_str(if order.descending { " DESC" } else { " ASC" });
        match order.nulls_first {
            Some(true) => sql.push_str(" NULLS FIRST"),
            Some(false) => sql.push_str(" NULLS LAST"),
            None => {}
        }
        Ok(sql)
    }

    /// Compiles an INSERT statement.
    pub fn build_insert(&self, stmt: &Insert) -> BuildResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let table = self.table_name(&stmt.table)?;

        if stmt.columns.is_empty() {
            return Err(SyntaxError::new(format!(
                "INSERT INTO \"{}\" requires a column list",
                stmt.table.name()
            )));
        }
        let columns: Vec<String> = stmt
            .columns
            .iter()
            .map(|c| self.dialect.pack_name(c.name()))
            .collect();

        let mut sql = format!("INSERT INTO {table} ({})", columns.join(", "));

        match &stmt.source {
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(SyntaxError::new(format!(
                        "INSERT INTO \"{}\" has no values",
                        stmt.table.name()
                    )));
                }
                let mut rendered = Vec::with_capacity(rows.len());
                for row in rows {
                    if row.len() != stmt.columns.len() {
                        return Err(SyntaxError::new(format!(
                            "INSERT INTO \"{}\" row has {} values for {} columns",
                            stmt.table.name(),
                            row.len(),
                            stmt.columns.len()
                        )));
                    }
                    let mut cells = Vec::with_capacity(row.len());
                    for cell in row {
                        cells.push(self.build_expression(cell, &mut params)?);
                    }
                    rendered.push(format!("({})", cells.join(", ")));
                }
                sql.push_str(" VALUES ");
                sql.push_str(&rendered.join(", "));
            }
            InsertSource::Query(query) => {
                sql.push(' ');
                sql.push_str(&self.build_select_into(query, &mut params)?);
            }
        }

        tracing::debug!(
            dialect = self.dialect.name,
            parameters = params.len(),
            "built INSERT statement"
        );
        Ok((sql, params))
    }

    /// Compiles an UPDATE statement.
    pub fn build_update(&self, stmt: &Update) -> BuildResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let table = self.table_name(&stmt.table)?;

        if stmt.assignments.is_empty() {
            return Err(SyntaxError::new(format!(
                "UPDATE \"{}\" has no assignments",
                stmt.table.name()
            )));
        }
        let mut sets = Vec::with_capacity(stmt.assignments.len());
        for (column, value) in &stmt.assignments {
            sets.push(format!(
                "{} = {}",
                self.dialect.pack_name(column.name()),
                self.build_expression(value, &mut params)?
            ));
        }

        let mut sql = format!("UPDATE {table} SET {}", sets.join(", "));
        if let Some(where_clause) = &stmt.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.build_expression(where_clause, &mut params)?);
        }

        tracing::debug!(
            dialect = self.dialect.name,
            parameters = params.len(),
            "built UPDATE statement"
        );
        Ok((sql, params))
    }

    /// Compiles a DELETE statement.
    pub fn build_delete(&self, stmt: &Delete) -> BuildResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let table = self.table_name(&stmt.table)?;

        let mut sql = format!("DELETE FROM {table}");
        if let Some(where_clause) = &stmt.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.build_expression(where_clause, &mut params)?);
        }

        tracing::debug!(
            dialect = self.dialect.name,
            parameters = params.len(),
            "built DELETE statement"
        );
        Ok((sql, params))
    }

    /// Compiles one expression node, appending any bound values to `params`.
    ///
    /// Operands are parenthesized exactly when their structural precedence is
    /// lower than the parent's (or equal on the right of a non-associative
    /// arithmetic operator), so the emitted text evaluates to the same tree
    /// under standard SQL precedence regardless of nesting depth.
    pub fn build_expression(
        &self,
        expr: &Expression,
        params: &mut Vec<Value>,
    ) -> BuildResult<String> {
        match expr {
            Expression::Literal(value) => match self.dialect.literal_policy {
                LiteralPolicy::Inline => self.dialect.pack_literal(value),
                LiteralPolicy::Bind => {
                    params.push(value.clone());
                    Ok(self.dialect.placeholder(params.len()))
                }
            },
            Expression::Column(column) => column.build(self.dialect),
            Expression::Star => Ok("*".to_string()),
            Expression::Function { name, args } => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in args {
                    parts.push(self.build_expression(arg, params)?);
                }
                Ok(format!("{name}({})", parts.join(", ")))
            }
            Expression::Aggregate {
                func,
                arg,
                distinct,
            } => {
                let arg_sql = self.build_expression(arg, params)?;
                let distinct_str = if *distinct { "DISTINCT " } else { "" };
                Ok(format!("{}({distinct_str}{arg_sql})", func.sql_name()))
            }
            Expression::Unary { op, expr: operand } => {
                let operand_sql = self.build_operand(operand, expr.precedence(), params)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{operand_sql}"),
                    UnaryOp::IsNull => format!("{operand_sql} IS NULL"),
                    UnaryOp::IsNotNull => format!("{operand_sql} IS NOT NULL"),
                })
            }
            Expression::Binary { op, left, right } => {
                let precedence = op.precedence();
                let left_sql = self.build_operand(left, precedence, params)?;
                let mut right_sql = self.build_operand(right, precedence, params)?;
                if right.precedence() == precedence && op.right_sensitive() {
                    right_sql = format!("({right_sql})");
                }
                Ok(format!("{left_sql} {} {right_sql}", op.symbol()))
            }
            Expression::And(children) => {
                // An empty conjunction is vacuously true.
                if children.is_empty() {
                    return Ok("1=1".to_string());
                }
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    parts.push(self.build_operand(child, expr.precedence(), params)?);
                }
                Ok(parts.join(" AND "))
            }
            Expression::Or(children) => {
                // An empty disjunction is vacuously false.
                if children.is_empty() {
                    return Ok("1=0".to_string());
                }
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    parts.push(self.build_operand(child, expr.precedence(), params)?);
                }
                Ok(parts.join(" OR "))
            }
            Expression::Not(inner) => {
                let inner_sql = self.build_expression(inner, params)?;
                Ok(format!("NOT ({inner_sql})"))
            }
            Expression::Group(inner) => {
                let inner_sql = self.build_expression(inner, params)?;
                Ok(format!("({inner_sql})"))
            }
            Expression::In {
                expr: tested,
                list,
                negated,
            } => {
                if list.is_empty() {
                    return Err(SyntaxError::new("IN predicate has an empty value list"));
                }
                let tested_sql = self.build_operand(tested, expr.precedence(), params)?;
                let mut items = Vec::with_capacity(list.len());
                for item in list {
                    items.push(self.build_expression(item, params)?);
                }
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{tested_sql} {keyword} ({})", items.join(", ")))
            }
            Expression::InSubquery {
                expr: tested,
                query,
                negated,
            } => {
                let tested_sql = self.build_operand(tested, expr.precedence(), params)?;
                let sub_sql = self.build_select_into(query, params)?;
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{tested_sql} {keyword} ({sub_sql})"))
            }
            Expression::Between {
                expr: tested,
                low,
                high,
                negated,
            } => {
                let precedence = expr.precedence();
                let tested_sql = self.build_operand(tested, precedence, params)?;
                let low_sql = self.build_operand(low, precedence, params)?;
                let high_sql = self.build_operand(high, precedence, params)?;
                let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                Ok(format!("{tested_sql} {keyword} {low_sql} AND {high_sql}"))
            }
            Expression::Exists { query, negated } => {
                let sub_sql = self.build_select_into(query, params)?;
                let keyword = if *negated { "NOT EXISTS" } else { "EXISTS" };
                Ok(format!("{keyword} ({sub_sql})"))
            }
            Expression::Subquery(query) => {
                let sub_sql = self.build_select_into(query, params)?;
                Ok(format!("({sub_sql})"))
            }
            Expression::Raw(fragment) => Ok(fragment.clone()),
            Expression::Aliased { expr: inner, alias } => {
                let inner_sql = self.build_expression(inner, params)?;
                Ok(format!("{inner_sql} AS {}", self.dialect.pack_name(alias)))
            }
        }
    }

    /// Compiles a child node, wrapping it in parentheses when its precedence
    /// is lower than the enclosing operator's.
    fn build_operand(
        &self,
        operand: &Expression,
        parent_precedence: u8,
        params: &mut Vec<Value>,
    ) -> BuildResult<String> {
        let sql = self.build_expression(operand, params)?;
        if operand.precedence() < parent_precedence {
            Ok(format!("({sql})"))
        } else {
            Ok(sql)
        }
    }

    /// Compiles the CREATE TABLE statement for a table.
    pub fn build_create_table(&self, table: &Table) -> BuildResult<String> {
        let name = self.table_name(table)?;
        let columns = table.columns();
        if columns.is_empty() {
            return Err(SyntaxError::new(format!(
                "table \"{}\" has no columns",
                table.name()
            )));
        }

        let flagged_keys = columns.iter().filter(|c| c.is_primary_key()).count();
        if flagged_keys > 1 {
            return Err(SyntaxError::new(format!(
                "table \"{}\" declares multiple primary key columns",
                table.name()
            )));
        }
        if flagged_keys > 0 && !table.primary_key_columns().is_empty() {
            return Err(SyntaxError::new(format!(
                "table \"{}\" declares both a column-level and a table-level primary key",
                table.name()
            )));
        }

        let mut parts = Vec::with_capacity(columns.len());
        for column in columns {
            parts.push(column.create(self.dialect)?);
        }

        if !table.primary_key_columns().is_empty() {
            let mut keys = Vec::new();
            for key in table.primary_key_columns() {
                if table.column(key).is_none() {
                    return Err(SyntaxError::new(format!(
                        "primary key references unknown column \"{key}\" of table \"{}\"",
                        table.name()
                    )));
                }
                keys.push(self.dialect.pack_name(key));
            }
            parts.push(format!("PRIMARY KEY ({})", keys.join(", ")));
        }

        for foreign_key in table.foreign_keys() {
            let mut local = Vec::with_capacity(foreign_key.columns.len());
            for column in &foreign_key.columns {
                if table.column(column).is_none() {
                    return Err(SyntaxError::new(format!(
                        "foreign key references unknown column \"{column}\" of table \"{}\"",
                        table.name()
                    )));
                }
                local.push(self.dialect.pack_name(column));
            }
            let referenced: Vec<String> = foreign_key
                .ref_columns
                .iter()
                .map(|c| self.dialect.pack_name(c))
                .collect();
            parts.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                local.join(", "),
                self.dialect.pack_name(&foreign_key.ref_table),
                referenced.join(", ")
            ));
        }

        let sql = format!("CREATE TABLE {name} ({})", parts.join(", "));
        tracing::debug!(dialect = self.dialect.name, table = table.name(), "built CREATE TABLE");
        Ok(sql)
    }

    /// Compiles the DROP TABLE statement for a table.
    pub fn build_drop_table(&self, table: &Table) -> BuildResult<String> {
        let name = self.table_name(table)?;
        Ok(format!("DROP TABLE IF EXISTS {name}"))
    }

    /// Packs a bare table name (no alias), rejecting empty names.
    fn table_name(&self, table: &Table) -> BuildResult<String> {
        if table.name().is_empty() {
            return Err(SyntaxError::new("table name is empty"));
        }
        Ok(self.dialect.pack_name(table.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::functions::{count_star, lcase, sum};
    use crate::predicate::{
        and, between, eq, exists, ge, gt, in_list, in_query, is_null, like, lt, ne, not, or,
    };
    use crate::schema::{Column, ForeignKey};
    use crate::statement::{Join, JoinType};
    use crate::types::DataKind;

    fn ansi() -> Dialect {
        Dialect::ansi()
    }

    fn pg() -> Dialect {
        Dialect::postgres()
    }

    fn inline() -> Dialect {
        Dialect::ansi().with_literal_policy(LiteralPolicy::Inline)
    }

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", DataKind::Int64).primary_key(),
                Column::new("age", DataKind::Int32),
                Column::new("name", DataKind::Varchar).length(100),
                Column::new("city", DataKind::Varchar),
            ],
        )
    }

    fn orders() -> Table {
        Table::new(
            "orders",
            vec![
                Column::new("id", DataKind::Int64).primary_key(),
                Column::new("user_id", DataKind::Int64),
                Column::new("total", DataKind::Double),
            ],
        )
    }

    // ── SELECT basics ────────────────────────────────────────────────

    #[test]
    fn test_select_star() {
        let (sql, params) = Select::from(users()).build(&ansi()).unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_star_postgres_quoted() {
        let (sql, _) = Select::from(users()).build(&pg()).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\"");
    }

    #[test]
    fn test_select_columns() {
        let t = users();
        let (sql, _) = Select::from(t.clone())
            .columns(vec![
                t.column("name").unwrap().into(),
                t.column("age").unwrap().into(),
            ])
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT users.name, users.age FROM users");
    }

    #[test]
    fn test_select_distinct() {
        let t = users();
        let (sql, _) = Select::from(t.clone())
            .columns(vec![t.column("city").unwrap().into()])
            .distinct()
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT DISTINCT users.city FROM users");
    }

    #[test]
    fn test_select_aliased_column_and_table() {
        let t = users().aliased("u");
        let (sql, _) = Select::from(t.clone())
            .columns(vec![Expression::from(t.column("name").unwrap()).alias("n")])
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"u\".\"name\" AS \"n\" FROM \"users\" AS \"u\""
        );
    }

    #[test]
    fn test_select_where_bind() {
        let t = users();
        let (sql, params) = Select::from(t.clone())
            .filter(eq(t.column("name").unwrap(), "Alice"))
            .build(&pg())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"users\".\"name\" = $1");
        assert_eq!(params, vec![Value::String("Alice".to_string())]);
    }

    #[test]
    fn test_select_where_inline() {
        let t = users();
        let (sql, params) = Select::from(t.clone())
            .filter(eq(t.column("age").unwrap(), 30))
            .build(&inline())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE users.age = 30");
        assert!(params.is_empty());
    }

    // ── The two literal policies over the same filter tree ───────────

    #[test]
    fn test_lcase_filter_inline_policy() {
        let t = Table::new("toDo", vec![Column::new("a", DataKind::Bool)]);
        let pred = eq(lcase(t.column("a").unwrap()), true);
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let mut params = Vec::new();
        let sql = builder.build_expression(&pred, &mut params).unwrap();
        assert_eq!(sql, "LCASE(toDo.a) = true");
        assert!(params.is_empty());
    }

    #[test]
    fn test_lcase_filter_bind_policy() {
        let t = Table::new("toDo", vec![Column::new("a", DataKind::Bool)]);
        let pred = eq(lcase(t.column("a").unwrap()), true);
        let dialect = ansi();
        let builder = QueryBuilder::new(&dialect);
        let mut params = Vec::new();
        let sql = builder.build_expression(&pred, &mut params).unwrap();
        assert_eq!(sql, "LCASE(toDo.a) = ?");
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    // ── Boolean combinators and parenthesization ─────────────────────

    #[test]
    fn test_where_and() {
        let t = users();
        let (sql, params) = Select::from(t.clone())
            .filter(and(
                eq(t.column("name").unwrap(), "Alice"),
                gt(t.column("age").unwrap(), 25),
            ))
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE \"users\".\"name\" = $1 AND \"users\".\"age\" > $2"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_or_inside_and_is_parenthesized() {
        let t = users();
        let a = t.column("age").unwrap();
        let pred = and(
            or(eq(&a, 1), eq(&a, 2)),
            ne(&a, 3),
        );
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        assert_eq!(
            sql,
            "(users.age = 1 OR users.age = 2) AND users.age <> 3"
        );
    }

    #[test]
    fn test_and_inside_or_keeps_structure() {
        let t = users();
        let a = t.column("age").unwrap();
        let pred = or(and(eq(&a, 1), eq(&a, 2)), eq(&a, 3));
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        // AND binds tighter than OR, so no parentheses are needed to keep
        // the original grouping.
        assert_eq!(sql, "users.age = 1 AND users.age = 2 OR users.age = 3");
    }

    #[test]
    fn test_not_wraps_operand() {
        let t = users();
        let pred = not(and(
            eq(t.column("age").unwrap(), 1),
            eq(t.column("age").unwrap(), 2),
        ));
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        assert_eq!(sql, "NOT (users.age = 1 AND users.age = 2)");
    }

    #[test]
    fn test_deep_nesting_preserves_structure() {
        let t = users();
        let a = t.column("age").unwrap();
        // ((a = 1 OR a = 2) AND NOT (a = 3)) OR a = 4
        let pred = or(
            and(or(eq(&a, 1), eq(&a, 2)), not(eq(&a, 3))),
            eq(&a, 4),
        );
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        assert_eq!(
            sql,
            "(users.age = 1 OR users.age = 2) AND NOT (users.age = 3) OR users.age = 4"
        );
    }

    #[test]
    fn test_empty_and_or_fallbacks() {
        let dialect = ansi();
        let builder = QueryBuilder::new(&dialect);
        assert_eq!(
            builder
                .build_expression(&Expression::And(vec![]), &mut Vec::new())
                .unwrap(),
            "1=1"
        );
        assert_eq!(
            builder
                .build_expression(&Expression::Or(vec![]), &mut Vec::new())
                .unwrap(),
            "1=0"
        );
    }

    // ── Arithmetic precedence ────────────────────────────────────────

    #[test]
    fn test_arithmetic_no_redundant_parens() {
        let t = orders();
        let total = Expression::from(t.column("total").unwrap());
        let expr = total.clone() * Expression::value(2) + Expression::value(1);
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&expr, &mut Vec::new()).unwrap();
        assert_eq!(sql, "orders.total * 2 + 1");
    }

    #[test]
    fn test_arithmetic_parens_for_lower_precedence_operand() {
        let t = orders();
        let total = Expression::from(t.column("total").unwrap());
        let expr = (total + Expression::value(1)) * Expression::value(2);
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&expr, &mut Vec::new()).unwrap();
        assert_eq!(sql, "(orders.total + 1) * 2");
    }

    #[test]
    fn test_subtraction_right_associativity_parens() {
        let a = Expression::value(10);
        let b = Expression::value(4) - Expression::value(1);
        let expr = a - b;
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&expr, &mut Vec::new()).unwrap();
        assert_eq!(sql, "10 - (4 - 1)");
    }

    #[test]
    fn test_negation() {
        let t = orders();
        let expr = -(Expression::from(t.column("total").unwrap()) + Expression::value(1));
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&expr, &mut Vec::new()).unwrap();
        assert_eq!(sql, "-(orders.total + 1)");
    }

    // ── Predicate forms ──────────────────────────────────────────────

    #[test]
    fn test_is_null_and_like() {
        let t = users();
        let pred = and(
            is_null(t.column("city").unwrap()),
            like(t.column("name").unwrap(), "A%"),
        );
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        assert_eq!(sql, "users.city IS NULL AND users.name LIKE 'A%'");
    }

    #[test]
    fn test_in_list_bound() {
        let t = users();
        let pred = in_list(t.column("id").unwrap(), vec![1, 2, 3]);
        let dialect = pg();
        let builder = QueryBuilder::new(&dialect);
        let mut params = Vec::new();
        let sql = builder.build_expression(&pred, &mut params).unwrap();
        assert_eq!(sql, "\"users\".\"id\" IN ($1, $2, $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_in_empty_list_fails() {
        let t = users();
        let pred = in_list::<i64>(t.column("id").unwrap(), vec![]);
        let dialect = ansi();
        let builder = QueryBuilder::new(&dialect);
        let err = builder
            .build_expression(&pred, &mut Vec::new())
            .unwrap_err();
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_between() {
        let t = users();
        let pred = between(t.column("age").unwrap(), 18, 65);
        let dialect = inline();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_expression(&pred, &mut Vec::new()).unwrap();
        assert_eq!(sql, "users.age BETWEEN 18 AND 65");
    }

    // ── Subqueries ───────────────────────────────────────────────────

    #[test]
    fn test_in_subquery_continues_parameter_numbering() {
        let u = users();
        let o = orders();
        let sub = Select::from(o.clone())
            .columns(vec![o.column("user_id").unwrap().into()])
            .filter(gt(o.column("total").unwrap(), 100));
        let (sql, params) = Select::from(u.clone())
            .filter(and(
                gt(u.column("age").unwrap(), 18),
                in_query(u.column("id").unwrap(), sub),
            ))
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE \"users\".\"age\" > $1 AND \"users\".\"id\" IN \
             (SELECT \"orders\".\"user_id\" FROM \"orders\" WHERE \"orders\".\"total\" > $2)"
        );
        assert_eq!(params, vec![Value::Int(18), Value::Int(100)]);
    }

    #[test]
    fn test_exists() {
        let u = users();
        let o = orders();
        let sub = Select::from(o.clone()).filter(eq(
            o.column("user_id").unwrap(),
            u.column("id").unwrap(),
        ));
        let (sql, _) = Select::from(u.clone())
            .filter(exists(sub))
            .build(&ansi())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE EXISTS (SELECT * FROM orders WHERE orders.user_id = users.id)"
        );
    }

    // ── JOIN / GROUP BY / HAVING / ORDER BY / LIMIT ──────────────────

    #[test]
    fn test_inner_join() {
        let u = users();
        let o = orders();
        let (sql, _) = Select::from(u.clone())
            .inner_join(
                o.clone(),
                eq(o.column("user_id").unwrap(), u.column("id").unwrap()),
            )
            .build(&ansi())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users INNER JOIN orders ON orders.user_id = users.id"
        );
    }

    #[test]
    fn test_left_join_with_alias() {
        let u = users();
        let o = orders().aliased("o");
        let (sql, _) = Select::from(u.clone())
            .left_join(
                o.clone(),
                eq(o.column("user_id").unwrap(), u.column("id").unwrap()),
            )
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" LEFT JOIN \"orders\" AS \"o\" ON \"o\".\"user_id\" = \"users\".\"id\""
        );
    }

    #[test]
    fn test_cross_join() {
        let (sql, _) = Select::from(users())
            .cross_join(orders())
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users CROSS JOIN orders");
    }

    #[test]
    fn test_cross_join_with_on_fails() {
        let u = users();
        let o = orders();
        let err = Select::from(u.clone())
            .join(Join {
                table: o.clone(),
                kind: JoinType::Cross,
                on: Some(eq(o.column("user_id").unwrap(), u.column("id").unwrap())),
            })
            .build(&ansi())
            .unwrap_err();
        assert!(err.message.contains("CROSS JOIN"));
    }

    #[test]
    fn test_join_without_on_fails() {
        let err = Select::from(users())
            .join(Join {
                table: orders(),
                kind: JoinType::Inner,
                on: None,
            })
            .build(&ansi())
            .unwrap_err();
        assert!(err.message.contains("requires an ON condition"));
    }

    #[test]
    fn test_group_by_and_having_aggregate() {
        let o = orders();
        let (sql, params) = Select::from(o.clone())
            .columns(vec![
                o.column("user_id").unwrap().into(),
                sum(o.column("total").unwrap()).alias("spent"),
            ])
            .group_by(vec![o.column("user_id").unwrap().into()])
            .having(gt(sum(o.column("total").unwrap()), 1000))
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"orders\".\"user_id\", SUM(\"orders\".\"total\") AS \"spent\" FROM \"orders\" \
             GROUP BY \"orders\".\"user_id\" HAVING SUM(\"orders\".\"total\") > $1"
        );
        assert_eq!(params, vec![Value::Int(1000)]);
    }

    #[test]
    fn test_having_non_aggregate_compiles() {
        // Placement rules for aggregates are deferred to the database, so a
        // HAVING over a plain column builds successfully.
        let o = orders();
        let result = Select::from(o.clone())
            .group_by(vec![o.column("user_id").unwrap().into()])
            .having(gt(o.column("total").unwrap(), 10))
            .build(&ansi());
        assert!(result.is_ok());
    }

    #[test]
    fn test_order_by_unqualified_columns() {
        let t = users();
        let (sql, _) = Select::from(t.clone())
            .order_by(vec![
                OrderBy::asc(t.column("name").unwrap()),
                OrderBy::desc(t.column("age").unwrap()),
            ])
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" ORDER BY \"name\" ASC, \"age\" DESC"
        );
    }

    #[test]
    fn test_order_by_nulls() {
        let t = users();
        let (sql, _) = Select::from(t.clone())
            .order_by(vec![OrderBy::asc(t.column("name").unwrap()).nulls_first()])
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users ORDER BY name ASC NULLS FIRST");
    }

    #[test]
    fn test_limit_offset() {
        let (sql, _) = Select::from(users())
            .limit(10)
            .offset(20)
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_count_star_select() {
        let (sql, _) = Select::from(users())
            .columns(vec![count_star()])
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM users");
    }

    // ── Parameter-count invariant ────────────────────────────────────

    #[test]
    fn test_placeholder_count_matches_parameters() {
        let t = users();
        let (sql, params) = Select::from(t.clone())
            .filter(and(
                or(
                    eq(t.column("name").unwrap(), "a"),
                    eq(t.column("name").unwrap(), "b"),
                ),
                and(
                    ge(t.column("age").unwrap(), 18),
                    lt(t.column("age").unwrap(), 99),
                ),
            ))
            .build(&ansi())
            .unwrap();
        assert_eq!(sql.matches('?').count(), params.len());
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_numbered_placeholders_are_sequential() {
        let t = users();
        let (sql, params) = Select::from(t.clone())
            .filter(and(
                and(
                    eq(t.column("name").unwrap(), "a"),
                    eq(t.column("city").unwrap(), "b"),
                ),
                eq(t.column("age").unwrap(), 3),
            ))
            .build(&pg())
            .unwrap();
        assert!(sql.contains("$1"));
        assert!(sql.contains("$2"));
        assert!(sql.contains("$3"));
        assert!(!sql.contains("$4"));
        assert_eq!(params.len(), 3);
    }

    // ── INSERT / UPDATE / DELETE ─────────────────────────────────────

    #[test]
    fn test_insert_values() {
        let t = users();
        let (sql, params) = Insert::into(t.clone())
            .columns(vec![t.column("name").unwrap(), t.column("age").unwrap()])
            .values(vec![Value::from("Alice"), Value::from(30)])
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES ($1, $2)"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_multi_row() {
        let t = users();
        let (sql, params) = Insert::into(t.clone())
            .columns(vec![t.column("name").unwrap()])
            .values(vec![Value::from("a")])
            .values(vec![Value::from("b")])
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "INSERT INTO users (name) VALUES (?), (?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_from_select() {
        let t = users();
        let archived = Table::new("archived_users", vec![Column::new("name", DataKind::Varchar)]);
        let (sql, params) = Insert::into(archived.clone())
            .columns(vec![archived.column("name").unwrap()])
            .query(
                Select::from(t.clone())
                    .columns(vec![t.column("name").unwrap().into()])
                    .filter(lt(t.column("age").unwrap(), 0)),
            )
            .build(&ansi())
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO archived_users (name) SELECT users.name FROM users WHERE users.age < ?"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_insert_arity_mismatch_fails() {
        let t = users();
        let err = Insert::into(t.clone())
            .columns(vec![t.column("name").unwrap(), t.column("age").unwrap()])
            .values(vec![Value::from("only one")])
            .build(&ansi())
            .unwrap_err();
        assert!(err.message.contains("1 values for 2 columns"));
    }

    #[test]
    fn test_insert_without_columns_fails() {
        let t = users();
        let err = Insert::into(t)
            .values(vec![Value::from(1)])
            .build(&ansi())
            .unwrap_err();
        assert!(err.message.contains("column list"));
    }

    #[test]
    fn test_insert_without_values_fails() {
        let t = users();
        let err = Insert::into(t.clone())
            .columns(vec![t.column("name").unwrap()])
            .build(&ansi())
            .unwrap_err();
        assert!(err.message.contains("no values"));
    }

    #[test]
    fn test_update() {
        let t = users();
        let (sql, params) = Update::table(t.clone())
            .set(t.column("name").unwrap(), "Updated")
            .set(t.column("age").unwrap(), 31)
            .filter(eq(t.column("id").unwrap(), 1))
            .build(&pg())
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"users\" SET \"name\" = $1, \"age\" = $2 WHERE \"users\".\"id\" = $3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_update_without_assignments_fails() {
        let err = Update::table(users()).build(&ansi()).unwrap_err();
        assert!(err.message.contains("no assignments"));
    }

    #[test]
    fn test_delete() {
        let t = users();
        let (sql, params) = Delete::from(t.clone())
            .filter(eq(t.column("id").unwrap(), 1))
            .build(&ansi())
            .unwrap();
        assert_eq!(sql, "DELETE FROM users WHERE users.id = ?");
        assert_eq!(params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_delete_all() {
        let (sql, params) = Delete::from(users()).build(&ansi()).unwrap();
        assert_eq!(sql, "DELETE FROM users");
        assert!(params.is_empty());
    }

    // ── DDL ──────────────────────────────────────────────────────────

    #[test]
    fn test_create_table_ansi() {
        let todos = Table::new(
            "toDos",
            vec![
                Column::new("toDo_id", DataKind::Int32)
                    .auto_increment()
                    .primary_key()
                    .not_null()
                    .unique(),
                Column::new("title", DataKind::Varchar).length(100),
            ],
        );
        let sql = todos.create(&ansi()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE toDos (toDo_id INTEGER AUTO_INCREMENT PRIMARY KEY NOT NULL UNIQUE, \
             title VARCHAR(100))"
        );
    }

    #[test]
    fn test_create_table_with_table_level_primary_key() {
        let t = Table::new(
            "memberships",
            vec![
                Column::new("user_id", DataKind::Int64).not_null(),
                Column::new("group_id", DataKind::Int64).not_null(),
            ],
        )
        .primary_key(&["user_id", "group_id"]);
        let sql = t.create(&pg()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"memberships\" (\"user_id\" BIGINT NOT NULL, \"group_id\" BIGINT NOT NULL, \
             PRIMARY KEY (\"user_id\", \"group_id\"))"
        );
    }

    #[test]
    fn test_create_table_with_foreign_key() {
        let t = Table::new(
            "orders",
            vec![
                Column::new("id", DataKind::Int64).primary_key(),
                Column::new("user_id", DataKind::Int64).not_null(),
            ],
        )
        .foreign_key(ForeignKey::new(&["user_id"], "users", &["id"]));
        let sql = t.create(&ansi()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE orders (id BIGINT PRIMARY KEY, user_id BIGINT NOT NULL, \
             FOREIGN KEY (user_id) REFERENCES users (id))"
        );
    }

    #[test]
    fn test_create_table_without_columns_fails() {
        let t = Table::new("empty", vec![]);
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("no columns"));
    }

    #[test]
    fn test_create_table_multiple_pk_columns_fails() {
        let t = Table::new(
            "bad",
            vec![
                Column::new("a", DataKind::Int32).primary_key(),
                Column::new("b", DataKind::Int32).primary_key(),
            ],
        );
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("multiple primary key"));
    }

    #[test]
    fn test_create_table_conflicting_pk_declarations_fails() {
        let t = Table::new(
            "bad",
            vec![
                Column::new("a", DataKind::Int32).primary_key(),
                Column::new("b", DataKind::Int32),
            ],
        )
        .primary_key(&["b"]);
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("both a column-level and a table-level"));
    }

    #[test]
    fn test_create_table_unknown_pk_column_fails() {
        let t = Table::new("bad", vec![Column::new("a", DataKind::Int32)]).primary_key(&["zzz"]);
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("zzz"));
    }

    #[test]
    fn test_create_table_unknown_fk_column_fails() {
        let t = Table::new("bad", vec![Column::new("a", DataKind::Int32)])
            .foreign_key(ForeignKey::new(&["missing"], "users", &["id"]));
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn test_create_table_column_without_kind_names_column() {
        let t = Table::new("bad", vec![Column::named("mystery")]);
        let err = t.create(&ansi()).unwrap_err();
        assert!(err.message.contains("mystery"));
        assert!(err.message.contains("data kind"));
    }

    #[test]
    fn test_drop_table() {
        let dialect = pg();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder.build_drop_table(&users()).unwrap();
        assert_eq!(sql, "DROP TABLE IF EXISTS \"users\"");
    }

    // ── Raw fragments ────────────────────────────────────────────────

    #[test]
    fn test_raw_fragment_passthrough() {
        let dialect = ansi();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder
            .build_expression(&Expression::raw("EXTRACT(YEAR FROM created_at)"), &mut Vec::new())
            .unwrap();
        assert_eq!(sql, "EXTRACT(YEAR FROM created_at)");
    }

    #[test]
    fn test_zero_arg_function_keeps_parens() {
        let dialect = ansi();
        let builder = QueryBuilder::new(&dialect);
        let sql = builder
            .build_expression(
                &crate::expression::functions::now(),
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(sql, "NOW()");
    }
}
