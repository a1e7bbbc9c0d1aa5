//! Dialect configuration: identifier quoting, placeholders, and type keywords.
//!
//! A [`Dialect`] is an immutable value object constructed once per target
//! database and passed by reference into every build call. It carries the
//! syntactic variations that distinguish SQL flavors: the identifier quote
//! pair, the parameter placeholder style, the literal handling policy, the
//! autoincrement clause generator, and the mapping from abstract
//! [`DataKind`]s to concrete SQL type keywords.

use crate::types::DataKind;
use crate::value::Value;
use tabula_core::{BuildResult, SyntaxError};

/// The characters wrapped around a quoted identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePair {
    /// Opening quote character.
    pub open: char,
    /// Closing quote character.
    pub close: char,
}

/// How bound parameters are spelled in the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Positional `?` placeholders (SQLite, MySQL).
    Question,
    /// Numbered placeholders with a prefix: `$1, $2, ...` (PostgreSQL).
    Numbered(&'static str),
    /// Named placeholders with a prefix: `:p1, :p2, ...`.
    Named(&'static str),
}

/// Whether literal values are bound as parameters or rendered inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiteralPolicy {
    /// Literals become placeholders and are returned in the parameter list.
    #[default]
    Bind,
    /// Literals are rendered directly into the SQL text.
    Inline,
}

/// Syntactic configuration for one target database.
///
/// A dialect is read-only during compilation and may be shared across any
/// number of concurrent build calls.
///
/// # Examples
///
/// ```
/// use tabula::dialect::Dialect;
///
/// let pg = Dialect::postgres();
/// assert_eq!(pg.pack_name("users"), "\"users\"");
/// // pack_name is idempotent: quoting twice changes nothing.
/// assert_eq!(pg.pack_name("\"users\""), "\"users\"");
/// ```
#[derive(Debug, Clone)]
pub struct Dialect {
    /// Dialect name, used in error messages and logging.
    pub name: &'static str,
    /// Identifier quoting; `None` emits identifiers unchanged.
    pub quote: Option<QuotePair>,
    /// Parameter placeholder style.
    pub placeholder: PlaceholderStyle,
    /// Literal handling policy.
    pub literal_policy: LiteralPolicy,
    /// Autoincrement clause generator. `None` falls back to
    /// `" AUTO_INCREMENT"`. A generator that returns an empty string for a
    /// kind signals an unsupported autoincrement/type combination.
    pub auto_increment: Option<fn(DataKind) -> String>,
    /// Mapping from abstract data kinds to SQL type keywords.
    pub type_keyword: fn(DataKind) -> &'static str,
    /// Whether booleans are spelled `1`/`0` instead of `true`/`false`.
    pub bool_as_int: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::ansi()
    }
}

impl Dialect {
    /// A generic ANSI-flavored dialect: unquoted identifiers, `?`
    /// placeholders, keyword booleans, `AUTO_INCREMENT` fallback.
    pub fn ansi() -> Self {
        Self {
            name: "ansi",
            quote: None,
            placeholder: PlaceholderStyle::Question,
            literal_policy: LiteralPolicy::Bind,
            auto_increment: None,
            type_keyword: ansi_type_keyword,
            bool_as_int: false,
        }
    }

    /// PostgreSQL: `"` quoting, `$n` placeholders, identity columns.
    pub fn postgres() -> Self {
        Self {
            name: "postgresql",
            quote: Some(QuotePair {
                open: '"',
                close: '"',
            }),
            placeholder: PlaceholderStyle::Numbered("$"),
            literal_policy: LiteralPolicy::Bind,
            auto_increment: Some(postgres_auto_increment),
            type_keyword: postgres_type_keyword,
            bool_as_int: false,
        }
    }

    /// MySQL: backtick quoting, `?` placeholders, `AUTO_INCREMENT` fallback.
    pub fn mysql() -> Self {
        Self {
            name: "mysql",
            quote: Some(QuotePair {
                open: '`',
                close: '`',
            }),
            placeholder: PlaceholderStyle::Question,
            literal_policy: LiteralPolicy::Bind,
            auto_increment: None,
            type_keyword: mysql_type_keyword,
            bool_as_int: false,
        }
    }

    /// SQLite: `"` quoting, `?` placeholders, numeric booleans. Explicit
    /// autoincrement is rejected (integer primary keys autoincrement
    /// implicitly), so the generator yields an empty clause for every kind.
    pub fn sqlite() -> Self {
        Self {
            name: "sqlite",
            quote: Some(QuotePair {
                open: '"',
                close: '"',
            }),
            placeholder: PlaceholderStyle::Question,
            literal_policy: LiteralPolicy::Bind,
            auto_increment: Some(sqlite_auto_increment),
            type_keyword: sqlite_type_keyword,
            bool_as_int: true,
        }
    }

    /// Returns a copy of this dialect with a different literal policy.
    #[must_use]
    pub fn with_literal_policy(mut self, policy: LiteralPolicy) -> Self {
        self.literal_policy = policy;
        self
    }

    /// Applies identifier quoting to a raw name.
    ///
    /// Idempotent: a name already wrapped in this dialect's quote pair is
    /// returned unchanged, so callers may quote defensively without risking
    /// double-quoted output.
    pub fn pack_name(&self, raw: &str) -> String {
        match self.quote {
            None => raw.to_string(),
            Some(q) => {
                if raw.len() >= 2 && raw.starts_with(q.open) && raw.ends_with(q.close) {
                    raw.to_string()
                } else {
                    format!("{}{raw}{}", q.open, q.close)
                }
            }
        }
    }

    /// Renders a runtime value as an inline SQL literal.
    ///
    /// Embedded quote characters in strings are doubled; booleans and NULL
    /// use the dialect spelling; date/time values render in ISO form inside
    /// single quotes. Binary data cannot be inlined safely and is rejected.
    pub fn pack_literal(&self, value: &Value) -> BuildResult<String> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(b) => Ok(match (self.bool_as_int, b) {
                (true, true) => "1".to_string(),
                (true, false) => "0".to_string(),
                (false, true) => "true".to_string(),
                (false, false) => "false".to_string(),
            }),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::String(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
            Value::Bytes(_) => Err(SyntaxError::new(format!(
                "binary values cannot be inlined as literals for the {} dialect; use a binding literal policy",
                self.name
            ))),
            Value::Date(d) => Ok(format!("'{d}'")),
            Value::Time(t) => Ok(format!("'{t}'")),
            Value::DateTime(dt) => Ok(format!("'{dt}'")),
            Value::Uuid(u) => Ok(format!("'{u}'")),
        }
    }

    /// Returns the placeholder for the given 1-based parameter index.
    pub fn placeholder(&self, index: usize) -> String {
        match self.placeholder {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered(prefix) => format!("{prefix}{index}"),
            PlaceholderStyle::Named(prefix) => format!("{prefix}p{index}"),
        }
    }

    /// Returns the SQL type keyword for an abstract data kind.
    pub fn type_keyword(&self, kind: DataKind) -> &'static str {
        (self.type_keyword)(kind)
    }

    /// Returns the autoincrement clause for a column of the given kind.
    ///
    /// Uses the dialect generator when one is configured, failing when it
    /// yields an empty clause; otherwise falls back to `" AUTO_INCREMENT"`.
    /// The column name is only used to build the error message.
    pub fn auto_increment_clause(&self, kind: DataKind, column: &str) -> BuildResult<String> {
        match self.auto_increment {
            Some(generator) => {
                let clause = generator(kind);
                if clause.is_empty() {
                    Err(SyntaxError::new(format!(
                        "the {} dialect does not support auto-increment for column \"{column}\" of kind {kind:?}",
                        self.name
                    )))
                } else {
                    Ok(clause)
                }
            }
            None => Ok(" AUTO_INCREMENT".to_string()),
        }
    }
}

// ── Type keyword tables ────────────────────────────────────────────────

fn ansi_type_keyword(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Bool => "BOOLEAN",
        DataKind::Int16 => "SMALLINT",
        DataKind::Int32 => "INTEGER",
        DataKind::Int64 => "BIGINT",
        DataKind::Float => "REAL",
        DataKind::Double => "DOUBLE PRECISION",
        DataKind::Char => "CHAR",
        DataKind::Varchar => "VARCHAR",
        DataKind::Text => "TEXT",
        DataKind::Date => "DATE",
        DataKind::Time => "TIME",
        DataKind::Timestamp => "TIMESTAMP",
        DataKind::Uuid => "UUID",
        DataKind::Binary => "BLOB",
    }
}

fn postgres_type_keyword(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Bool => "BOOLEAN",
        DataKind::Int16 => "SMALLINT",
        DataKind::Int32 => "INTEGER",
        DataKind::Int64 => "BIGINT",
        DataKind::Float => "REAL",
        DataKind::Double => "DOUBLE PRECISION",
        DataKind::Char => "CHAR",
        DataKind::Varchar => "VARCHAR",
        DataKind::Text => "TEXT",
        DataKind::Date => "DATE",
        DataKind::Time => "TIME",
        DataKind::Timestamp => "TIMESTAMP",
        DataKind::Uuid => "UUID",
        DataKind::Binary => "BYTEA",
    }
}

fn mysql_type_keyword(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Bool => "TINYINT(1)",
        DataKind::Int16 => "SMALLINT",
        DataKind::Int32 => "INT",
        DataKind::Int64 => "BIGINT",
        DataKind::Float => "FLOAT",
        DataKind::Double => "DOUBLE",
        DataKind::Char => "CHAR",
        DataKind::Varchar => "VARCHAR",
        DataKind::Text => "LONGTEXT",
        DataKind::Date => "DATE",
        DataKind::Time => "TIME",
        DataKind::Timestamp => "DATETIME",
        DataKind::Uuid => "CHAR(36)",
        DataKind::Binary => "LONGBLOB",
    }
}

fn sqlite_type_keyword(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Bool
        | DataKind::Int16
        | DataKind::Int32
        | DataKind::Int64 => "INTEGER",
        DataKind::Float | DataKind::Double => "REAL",
        DataKind::Char
        | DataKind::Varchar
        | DataKind::Text
        | DataKind::Date
        | DataKind::Time
        | DataKind::Timestamp
        | DataKind::Uuid => "TEXT",
        DataKind::Binary => "BLOB",
    }
}

// ── Autoincrement generators ───────────────────────────────────────────

fn postgres_auto_increment(kind: DataKind) -> String {
    if kind.is_integer() {
        " GENERATED ALWAYS AS IDENTITY".to_string()
    } else {
        String::new()
    }
}

fn sqlite_auto_increment(_kind: DataKind) -> String {
    String::new()
}
