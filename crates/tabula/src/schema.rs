//! Schema entities: tables and columns.
//!
//! A [`Table`] owns its ordered [`Column`]s; each column holds a non-owning
//! back-reference to the table it belongs to. The back-reference is a
//! [`Weak`] pointer, so a column never extends its table's lifetime: a column
//! clone can be held and compiled after the query object that produced it is
//! gone, as long as the `Table` itself is still alive somewhere. A column
//! whose table has been dropped (or that was never attached) fails to build
//! with a naming error rather than dangling.
//!
//! Tables and columns are immutable once constructed. Alias and key
//! operations return new objects, so the same instance may be referenced
//! from multiple query clauses concurrently.

use std::sync::{Arc, Weak};

use crate::builder::QueryBuilder;
use crate::dialect::Dialect;
use crate::types::DataKind;
use crate::value::Value;
use tabula_core::{BuildResult, SyntaxError};

#[derive(Debug)]
pub(crate) struct TableInner {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) columns: Vec<Column>,
    pub(crate) primary_key: Vec<String>,
    pub(crate) foreign_keys: Vec<ForeignKey>,
}

/// A foreign-key descriptor attached to a table.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// The referencing columns of this table.
    pub columns: Vec<String>,
    /// The referenced table name.
    pub ref_table: String,
    /// The referenced columns.
    pub ref_columns: Vec<String>,
}

impl ForeignKey {
    /// Creates a foreign-key descriptor.
    pub fn new(columns: &[&str], ref_table: impl Into<String>, ref_columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            ref_table: ref_table.into(),
            ref_columns: ref_columns.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A typed descriptor of one table column.
///
/// Built with a consuming builder in declaration style:
///
/// ```
/// use tabula::schema::Column;
/// use tabula::types::DataKind;
///
/// let id = Column::new("id", DataKind::Int64).primary_key().not_null();
/// let name = Column::new("name", DataKind::Varchar).length(100).unique();
/// ```
///
/// A column constructed with [`Column::named`] carries no declared data kind
/// and can only be referenced in queries, not used in DDL creation.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    alias: Option<String>,
    table: Weak<TableInner>,
    kind: Option<DataKind>,
    length: Option<u32>,
    primary_key: bool,
    not_null: bool,
    unique: bool,
    auto_increment: bool,
    default: Option<Value>,
    check: Option<String>,
    collate: Option<String>,
}

impl Column {
    /// Creates a column with a declared data kind.
    pub fn new(name: impl Into<String>, kind: DataKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            table: Weak::new(),
            kind: Some(kind),
            length: None,
            primary_key: false,
            not_null: false,
            unique: false,
            auto_increment: false,
            default: None,
            check: None,
            collate: None,
        }
    }

    /// Creates a column without a declared data kind, for referencing
    /// existing tables. Such a column cannot appear in DDL creation.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: None,
            ..Self::new(name, DataKind::Text)
        }
    }

    /// Sets the length (or precision) appended to the type keyword.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Marks this column as a primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Adds a NOT NULL constraint.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks this column as auto-incrementing.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attaches a CHECK expression to the column definition.
    #[must_use]
    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.check = Some(expression.into());
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collate(mut self, collation: impl Into<String>) -> Self {
        self.collate = Some(collation.into());
        self
    }

    /// Returns a copy of this column carrying an alias. The original column
    /// is untouched; other clauses referencing it keep seeing the bare name.
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        let mut column = self.clone();
        column.alias = Some(alias.into());
        column
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column alias, if one was set.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The declared data kind, if any.
    pub const fn data_kind(&self) -> Option<DataKind> {
        self.kind
    }

    /// Whether this column was flagged as a primary key.
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The owning table, if the column is attached and the table is alive.
    pub fn table(&self) -> Option<Table> {
        self.table.upgrade().map(|inner| Table { inner })
    }

    pub(crate) fn attach(&mut self, table: Weak<TableInner>) {
        self.table = table;
    }

    fn owning_table(&self) -> BuildResult<Arc<TableInner>> {
        let inner = self.table.upgrade().ok_or_else(|| {
            SyntaxError::new(format!(
                "column \"{}\" is not attached to a table",
                self.name
            ))
        })?;
        if inner.name.is_empty() {
            return Err(SyntaxError::new(format!(
                "the table owning column \"{}\" has an empty name",
                self.name
            )));
        }
        Ok(inner)
    }

    /// Builds the qualified reference `table.column[ AS alias]`.
    ///
    /// Qualification uses the table alias when one is set. Fails with a
    /// naming error when the column is detached or its table name is empty.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<String> {
        let table = self.owning_table()?;
        let qualifier = table.alias.as_deref().unwrap_or(&table.name);
        let mut sql = format!(
            "{}.{}",
            dialect.pack_name(qualifier),
            dialect.pack_name(&self.name)
        );
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(&dialect.pack_name(alias));
        }
        Ok(sql)
    }

    /// Builds the unqualified name, for index and ORDER BY lists.
    pub fn build_index(&self, dialect: &Dialect) -> String {
        dialect.pack_name(&self.name)
    }

    /// Builds the DDL fragment for this column in fixed order: name, type
    /// keyword (+length), autoincrement clause, PRIMARY KEY, NOT NULL,
    /// UNIQUE, DEFAULT, CHECK, COLLATE.
    ///
    /// Fails when no data kind is declared, when the dialect rejects the
    /// autoincrement/kind combination, when the default value cannot be
    /// rendered as a literal, or when the check text is malformed.
    pub fn create(&self, dialect: &Dialect) -> BuildResult<String> {
        let kind = self.kind.ok_or_else(|| {
            SyntaxError::new(format!(
                "column \"{}\" has no declared data kind",
                self.name
            ))
        })?;

        let mut sql = dialect.pack_name(&self.name);
        sql.push(' ');
        sql.push_str(dialect.type_keyword(kind));
        if let Some(length) = self.length {
            sql.push_str(&format!("({length})"));
        }
        if self.auto_increment {
            sql.push_str(&dialect.auto_increment_clause(kind, &self.name)?);
        }
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&dialect.pack_literal(default)?);
        }
        if let Some(check) = &self.check {
            if !check_is_well_formed(check) {
                return Err(SyntaxError::new(format!(
                    "malformed check expression on column \"{}\": {check:?}",
                    self.name
                )));
            }
            sql.push_str(&format!(" CHECK ({check})"));
        }
        if let Some(collation) = &self.collate {
            sql.push_str(" COLLATE ");
            sql.push_str(&dialect.pack_name(collation));
        }
        Ok(sql)
    }
}

/// Returns `false` for empty check text or unbalanced parentheses.
fn check_is_well_formed(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let mut depth = 0_i32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// A typed descriptor of one database table.
///
/// Columns are attached at construction time; their back-references are
/// fixed then and never change. All modifier methods return a new `Table`.
///
/// ```
/// use tabula::schema::{Column, Table};
/// use tabula::types::DataKind;
///
/// let users = Table::new(
///     "users",
///     vec![
///         Column::new("id", DataKind::Int64).primary_key(),
///         Column::new("email", DataKind::Varchar).length(254).unique(),
///     ],
/// );
/// assert_eq!(users.column("email").unwrap().name(), "email");
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    inner: Arc<TableInner>,
}

impl Table {
    /// Creates a table from its name and ordered column list.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::assemble(name.into(), None, columns, Vec::new(), Vec::new())
    }

    fn assemble(
        name: String,
        alias: Option<String>,
        columns: Vec<Column>,
        primary_key: Vec<String>,
        foreign_keys: Vec<ForeignKey>,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<TableInner>| {
            let columns = columns
                .into_iter()
                .map(|mut column| {
                    column.attach(weak.clone());
                    column
                })
                .collect();
            TableInner {
                name,
                alias,
                columns,
                primary_key,
                foreign_keys,
            }
        });
        Self { inner }
    }

    /// Returns a copy of this table with a table-level primary key over the
    /// named columns.
    #[must_use]
    pub fn primary_key(&self, columns: &[&str]) -> Self {
        Self::assemble(
            self.inner.name.clone(),
            self.inner.alias.clone(),
            self.inner.columns.clone(),
            columns.iter().map(ToString::to_string).collect(),
            self.inner.foreign_keys.clone(),
        )
    }

    /// Returns a copy of this table with an additional foreign key.
    #[must_use]
    pub fn foreign_key(&self, foreign_key: ForeignKey) -> Self {
        let mut foreign_keys = self.inner.foreign_keys.clone();
        foreign_keys.push(foreign_key);
        Self::assemble(
            self.inner.name.clone(),
            self.inner.alias.clone(),
            self.inner.columns.clone(),
            self.inner.primary_key.clone(),
            foreign_keys,
        )
    }

    /// Returns a copy of this table carrying an alias; column references
    /// obtained from the copy qualify themselves with the alias.
    #[must_use]
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        Self::assemble(
            self.inner.name.clone(),
            Some(alias.into()),
            self.inner.columns.clone(),
            self.inner.primary_key.clone(),
            self.inner.foreign_keys.clone(),
        )
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The table alias, if one was set.
    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    /// The ordered columns.
    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    /// Looks up a column by name, returning a clone that stays attached.
    pub fn column(&self, name: &str) -> Option<Column> {
        self.inner.columns.iter().find(|c| c.name == name).cloned()
    }

    pub(crate) fn primary_key_columns(&self) -> &[String] {
        &self.inner.primary_key
    }

    pub(crate) fn foreign_keys(&self) -> &[ForeignKey] {
        &self.inner.foreign_keys
    }

    /// Builds the FROM-clause reference `name[ AS alias]`.
    pub fn build(&self, dialect: &Dialect) -> BuildResult<String> {
        if self.inner.name.is_empty() {
            return Err(SyntaxError::new("table name is empty"));
        }
        let mut sql = dialect.pack_name(&self.inner.name);
        if let Some(alias) = &self.inner.alias {
            sql.push_str(" AS ");
            sql.push_str(&dialect.pack_name(alias));
        }
        Ok(sql)
    }

    /// Compiles the CREATE TABLE statement for this table.
    pub fn create(&self, dialect: &Dialect) -> BuildResult<String> {
        QueryBuilder::new(dialect).build_create_table(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo_table() -> Table {
        Table::new(
            "toDos",
            vec![
                Column::new("toDo_id", DataKind::Int32)
                    .auto_increment()
                    .primary_key()
                    .not_null()
                    .unique(),
                Column::new("title", DataKind::Varchar).length(100),
                Column::new("done", DataKind::Bool).default(false),
            ],
        )
    }

    // ── Column reference building ────────────────────────────────────

    #[test]
    fn test_column_build_qualified() {
        let table = todo_table();
        let col = table.column("title").unwrap();
        assert_eq!(col.build(&Dialect::ansi()).unwrap(), "toDos.title");
        assert_eq!(
            col.build(&Dialect::postgres()).unwrap(),
            "\"toDos\".\"title\""
        );
    }

    #[test]
    fn test_column_build_idempotent() {
        let table = todo_table();
        let col = table.column("title").unwrap();
        let dialect = Dialect::postgres();
        let first = col.build(&dialect).unwrap();
        let second = col.build(&dialect).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_column_build_with_alias() {
        let table = todo_table();
        let col = table.column("title").unwrap().aliased("headline");
        assert_eq!(
            col.build(&Dialect::ansi()).unwrap(),
            "toDos.title AS headline"
        );
        // The original column is untouched.
        assert_eq!(
            table.column("title").unwrap().build(&Dialect::ansi()).unwrap(),
            "toDos.title"
        );
    }

    #[test]
    fn test_column_build_uses_table_alias() {
        let table = todo_table().aliased("t");
        let col = table.column("title").unwrap();
        assert_eq!(col.build(&Dialect::ansi()).unwrap(), "t.title");
    }

    #[test]
    fn test_column_build_index_unqualified() {
        let table = todo_table();
        let col = table.column("title").unwrap();
        assert_eq!(col.build_index(&Dialect::ansi()), "title");
        assert_eq!(col.build_index(&Dialect::mysql()), "`title`");
    }

    #[test]
    fn test_detached_column_fails() {
        let col = Column::new("orphan", DataKind::Int32);
        let err = col.build(&Dialect::ansi()).unwrap_err();
        assert!(err.message.contains("orphan"));
    }

    #[test]
    fn test_column_outlives_query_not_table() {
        let table = todo_table();
        let col = table.column("title").unwrap();
        // Dropping clones of the table does not invalidate the column while
        // one Table handle survives.
        let extra = table.clone();
        drop(extra);
        assert!(col.build(&Dialect::ansi()).is_ok());
        // Once every Table handle is gone the weak back-reference is dead.
        drop(table);
        assert!(col.build(&Dialect::ansi()).is_err());
    }

    #[test]
    fn test_empty_table_name_fails() {
        let table = Table::new("", vec![Column::new("a", DataKind::Int32)]);
        let col = table.column("a").unwrap();
        let err = col.build(&Dialect::ansi()).unwrap_err();
        assert!(err.message.contains("empty name"));
        assert!(table.build(&Dialect::ansi()).is_err());
    }

    // ── Column DDL fragments ─────────────────────────────────────────

    #[test]
    fn test_column_create_full_flags() {
        let table = todo_table();
        let col = table.column("toDo_id").unwrap();
        assert_eq!(
            col.create(&Dialect::ansi()).unwrap(),
            "toDo_id INTEGER AUTO_INCREMENT PRIMARY KEY NOT NULL UNIQUE"
        );
    }

    #[test]
    fn test_column_create_without_kind_fails() {
        let col = Column::named("toDo_id");
        let err = col.create(&Dialect::ansi()).unwrap_err();
        assert!(err.message.contains("toDo_id"));
        assert!(err.message.contains("data kind"));
    }

    #[test]
    fn test_column_create_with_length() {
        let col = Column::new("title", DataKind::Varchar).length(100);
        assert_eq!(col.create(&Dialect::ansi()).unwrap(), "title VARCHAR(100)");
    }

    #[test]
    fn test_column_create_with_default() {
        let col = Column::new("done", DataKind::Bool).default(false);
        assert_eq!(
            col.create(&Dialect::ansi()).unwrap(),
            "done BOOLEAN DEFAULT false"
        );
        assert_eq!(
            col.create(&Dialect::sqlite()).unwrap(),
            "\"done\" INTEGER DEFAULT 0"
        );
    }

    #[test]
    fn test_column_create_with_string_default_escaped() {
        let col = Column::new("status", DataKind::Varchar)
            .length(20)
            .default("it's new");
        assert_eq!(
            col.create(&Dialect::ansi()).unwrap(),
            "status VARCHAR(20) DEFAULT 'it''s new'"
        );
    }

    #[test]
    fn test_column_create_with_check_and_collate() {
        let col = Column::new("age", DataKind::Int32)
            .check("age >= 0")
            .collate("binary");
        assert_eq!(
            col.create(&Dialect::ansi()).unwrap(),
            "age INTEGER CHECK (age >= 0) COLLATE binary"
        );
    }

    #[test]
    fn test_column_create_malformed_check() {
        let col = Column::new("age", DataKind::Int32).check("age >= (0");
        let err = col.create(&Dialect::ansi()).unwrap_err();
        assert!(err.message.contains("malformed check"));

        let empty = Column::new("age", DataKind::Int32).check("  ");
        assert!(empty.create(&Dialect::ansi()).is_err());
    }

    #[test]
    fn test_column_create_auto_increment_unsupported() {
        let col = Column::new("id", DataKind::Text).auto_increment();
        let err = col.create(&Dialect::postgres()).unwrap_err();
        assert!(err.message.contains("id"));
    }

    #[test]
    fn test_column_create_postgres_identity() {
        let col = Column::new("id", DataKind::Int64)
            .auto_increment()
            .primary_key();
        assert_eq!(
            col.create(&Dialect::postgres()).unwrap(),
            "\"id\" BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY"
        );
    }

    // ── Table behavior ───────────────────────────────────────────────

    #[test]
    fn test_table_build() {
        let table = todo_table();
        assert_eq!(table.build(&Dialect::ansi()).unwrap(), "toDos");
        assert_eq!(
            table.aliased("t").build(&Dialect::postgres()).unwrap(),
            "\"toDos\" AS \"t\""
        );
    }

    #[test]
    fn test_table_column_lookup() {
        let table = todo_table();
        assert!(table.column("title").is_some());
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_table_aliased_is_new_object() {
        let table = todo_table();
        let aliased = table.aliased("t");
        assert_eq!(table.alias(), None);
        assert_eq!(aliased.alias(), Some("t"));
        // Columns of the original still qualify with the bare name.
        assert_eq!(
            table.column("title").unwrap().build(&Dialect::ansi()).unwrap(),
            "toDos.title"
        );
    }

    #[test]
    fn test_table_primary_key_and_foreign_key() {
        let table = todo_table()
            .primary_key(&["toDo_id"])
            .foreign_key(ForeignKey::new(&["owner_id"], "users", &["id"]));
        assert_eq!(table.primary_key_columns(), &["toDo_id".to_string()]);
        assert_eq!(table.foreign_keys().len(), 1);
    }

    #[test]
    fn test_check_is_well_formed() {
        assert!(check_is_well_formed("age >= 0"));
        assert!(check_is_well_formed("(a + b) > (c)"));
        assert!(!check_is_well_formed(""));
        assert!(!check_is_well_formed("(a"));
        assert!(!check_is_well_formed("a)"));
    }
}
