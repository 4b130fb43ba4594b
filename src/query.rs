//! Structured SQL statement assembly.
//!
//! Clause builders keep explicit ordered fields — filter and order terms
//! render in insertion order, never in incidental map-iteration order. All
//! output is plain SQL text built by concatenation; nothing here escapes or
//! parametrizes values (see the crate-level security note).

use crate::value::{RowData, SqlValue};

/// Sort direction for an `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
    /// `ASC NULLS LAST`
    AscNullsLast,
    /// `DESC NULLS FIRST`
    DescNullsFirst,
}

impl OrderDir {
    /// Returns the SQL keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::AscNullsLast => "ASC NULLS LAST",
            Self::DescNullsFirst => "DESC NULLS FIRST",
        }
    }
}

/// An ordered list of `(column, predicate-fragment)` pairs.
///
/// Renders `WHERE c1 f1 AND c2 f2 …`, or nothing when empty. Fragments are
/// opaque strings, typically produced by [`crate::statement`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(Vec<(String, String)>);

impl Filters {
    /// Creates an empty filter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a `(column, fragment)` pair, preserving order.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.0.push((column.into(), fragment.into()));
        self
    }

    /// Returns `true` when no filters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the `WHERE` clause, or `None` when empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let terms: Vec<String> = self
            .0
            .iter()
            .map(|(column, fragment)| format!("{column} {fragment}"))
            .collect();
        Some(format!("WHERE {}", terms.join(" AND ")))
    }
}

/// An ordered list of `(column, direction)` pairs.
///
/// Renders `ORDER BY c1 DIR, c2 DIR …`, or nothing when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy(Vec<(String, OrderDir)>);

impl OrderBy {
    /// Creates an empty order list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a `(column, direction)` pair, preserving order.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, dir: OrderDir) -> Self {
        self.0.push((column.into(), dir));
        self
    }

    /// Returns `true` when no order terms are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the `ORDER BY` clause, or `None` when empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let terms: Vec<String> = self
            .0
            .iter()
            .map(|(column, dir)| format!("{column} {}", dir.as_str()))
            .collect();
        Some(format!("ORDER BY {}", terms.join(", ")))
    }
}

/// A structured `SELECT` statement builder.
///
/// Holds explicit clause fields: source tables (joined with `NATURAL JOIN`
/// when more than one), select list (`*` when empty), filters, and order
/// terms. [`build`](Self::build) renders the statement with single spaces and
/// a trailing semicolon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    tables: Vec<String>,
    select: Vec<String>,
    filters: Filters,
    order: OrderBy,
}

impl SelectQuery {
    /// Starts a query from a single source table.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            tables: vec![name.into()],
            ..Self::default()
        }
    }

    /// Appends a source table, natural-joined with the previous ones.
    #[must_use]
    pub fn join(mut self, name: impl Into<String>) -> Self {
        self.tables.push(name.into());
        self
    }

    /// Appends a column to the select list (empty list renders `*`).
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.select.push(name.into());
        self
    }

    /// Appends a `(column, fragment)` filter term.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.filters = self.filters.with(column, fragment);
        self
    }

    /// Appends an `(column, direction)` order term.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, dir: OrderDir) -> Self {
        self.order = self.order.with(column, dir);
        self
    }

    /// The rendered source list: names joined with `NATURAL JOIN`.
    #[must_use]
    pub fn source(&self) -> String {
        self.tables.join(" NATURAL JOIN ")
    }

    /// Renders the full `SELECT` statement.
    ///
    /// # Examples
    ///
    /// ```
    /// use litewrap::{OrderDir, SelectQuery};
    ///
    /// let sql = SelectQuery::table("t1")
    ///     .join("t2")
    ///     .column("t1.x")
    ///     .filter("t1.id", "== '5'")
    ///     .order_by("t1.x", OrderDir::Asc)
    ///     .build();
    /// assert_eq!(
    ///     sql,
    ///     "SELECT t1.x FROM t1 NATURAL JOIN t2 WHERE t1.id == '5' ORDER BY t1.x ASC;"
    /// );
    /// ```
    #[must_use]
    pub fn build(&self) -> String {
        let select = if self.select.is_empty() {
            "*".to_string()
        } else {
            self.select.join(", ")
        };
        let mut parts = vec![format!("SELECT {select}"), format!("FROM {}", self.source())];
        if let Some(where_clause) = self.filters.render() {
            parts.push(where_clause);
        }
        if let Some(order_clause) = self.order.render() {
            parts.push(order_clause);
        }
        format!("{};", parts.join(" "))
    }

    /// Renders the matching `SELECT COUNT(*)` statement (select list and
    /// order terms are ignored).
    #[must_use]
    pub fn build_count(&self) -> String {
        let mut parts = vec![format!("SELECT COUNT(*) FROM {}", self.source())];
        if let Some(where_clause) = self.filters.render() {
            parts.push(where_clause);
        }
        format!("{};", parts.join(" "))
    }
}

/// Renders `INSERT [OR IGNORE ]INTO {table} (c1, c2) VALUES (v1, v2);`.
///
/// Columns and values correspond positionally, taken from the payload in
/// insertion order.
#[must_use]
pub fn insert_statement(table: &str, data: &RowData, ignore: bool) -> String {
    let ignore_kw = if ignore { "OR IGNORE " } else { "" };
    format!(
        "INSERT {ignore_kw}INTO {table} ({}) VALUES ({});",
        column_list(data),
        value_list(data)
    )
}

/// Renders `UPDATE {table} SET (c1, c2) = (v1, v2)[ WHERE …];`.
#[must_use]
pub fn update_statement(table: &str, data: &RowData, filters: &Filters) -> String {
    let set = format!("SET ({}) = ({})", column_list(data), value_list(data));
    filters.render().map_or_else(
        || format!("UPDATE {table} {set};"),
        |where_clause| format!("UPDATE {table} {set} {where_clause};"),
    )
}

/// Renders `DELETE FROM {table}[ WHERE …];`.
#[must_use]
pub fn delete_statement(table: &str, filters: &Filters) -> String {
    filters.render().map_or_else(
        || format!("DELETE FROM {table};"),
        |where_clause| format!("DELETE FROM {table} {where_clause};"),
    )
}

/// Renders `ALTER TABLE {table} ADD COLUMN {col} {TYPE}[ DEFAULT {v}];`.
///
/// The type is upper-cased; the default is rendered only when present.
#[must_use]
pub fn add_column_statement(
    table: &str,
    column: &str,
    sql_type: &str,
    default: Option<&SqlValue>,
) -> String {
    let sql_type = sql_type.to_uppercase();
    default.map_or_else(
        || format!("ALTER TABLE {table} ADD COLUMN {column} {sql_type};"),
        |value| format!("ALTER TABLE {table} ADD COLUMN {column} {sql_type} DEFAULT {value};"),
    )
}

/// Renders `DROP TABLE IF EXISTS {table};`.
#[must_use]
pub fn drop_table_statement(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table};")
}

fn column_list(data: &RowData) -> String {
    let columns: Vec<&str> = data.iter().map(|(c, _)| c.as_str()).collect();
    columns.join(", ")
}

fn value_list(data: &RowData) -> String {
    let values: Vec<String> = data.iter().map(|(_, v)| v.to_string()).collect();
    values.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_from_single_table() {
        assert_eq!(SelectQuery::table("t").build(), "SELECT * FROM t;");
    }

    #[test]
    fn test_select_full_shape_byte_exact() {
        let sql = SelectQuery::table("t1")
            .join("t2")
            .column("t1.x")
            .filter("t1.id", "== '5'")
            .order_by("t1.x", OrderDir::Asc)
            .build();
        assert_eq!(
            sql,
            "SELECT t1.x FROM t1 NATURAL JOIN t2 WHERE t1.id == '5' ORDER BY t1.x ASC;"
        );
    }

    #[test]
    fn test_multiple_filters_and_orders_preserve_order() {
        let sql = SelectQuery::table("t")
            .filter("a", "== '1'")
            .filter("b", "IS NULL")
            .order_by("a", OrderDir::Desc)
            .order_by("b", OrderDir::AscNullsLast)
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE a == '1' AND b IS NULL ORDER BY a DESC, b ASC NULLS LAST;"
        );
    }

    #[test]
    fn test_count_ignores_select_and_order() {
        let sql = SelectQuery::table("t")
            .column("x")
            .filter("x", "> '0'")
            .order_by("x", OrderDir::Asc)
            .build_count();
        assert_eq!(sql, "SELECT COUNT(*) FROM t WHERE x > '0';");
    }

    #[test]
    fn test_empty_clauses_render_nothing() {
        assert!(Filters::new().render().is_none());
        assert!(OrderBy::new().render().is_none());
    }

    #[test]
    fn test_insert_statement() {
        let data = RowData::new().with("a", 1).with("b", "x");
        assert_eq!(
            insert_statement("t", &data, false),
            "INSERT INTO t (a, b) VALUES (1, 'x');"
        );
        assert_eq!(
            insert_statement("t", &data, true),
            "INSERT OR IGNORE INTO t (a, b) VALUES (1, 'x');"
        );
    }

    #[test]
    fn test_update_statement() {
        let data = RowData::new().with("a", 2);
        let filters = Filters::new().with("id", "== '7'");
        assert_eq!(
            update_statement("t", &data, &filters),
            "UPDATE t SET (a) = (2) WHERE id == '7';"
        );
        assert_eq!(
            update_statement("t", &data, &Filters::new()),
            "UPDATE t SET (a) = (2);"
        );
    }

    #[test]
    fn test_delete_statement() {
        let filters = Filters::new().with("id", "== '7'");
        assert_eq!(
            delete_statement("t", &filters),
            "DELETE FROM t WHERE id == '7';"
        );
        assert_eq!(delete_statement("t", &Filters::new()), "DELETE FROM t;");
    }

    #[test]
    fn test_add_column_statement() {
        assert_eq!(
            add_column_statement("t", "c", "text", None),
            "ALTER TABLE t ADD COLUMN c TEXT;"
        );
        let default = SqlValue::from(0);
        assert_eq!(
            add_column_statement("t", "c", "integer", Some(&default)),
            "ALTER TABLE t ADD COLUMN c INTEGER DEFAULT 0;"
        );
    }

    #[test]
    fn test_drop_table_statement() {
        assert_eq!(drop_table_statement("t"), "DROP TABLE IF EXISTS t;");
    }
}
