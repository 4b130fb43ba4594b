//! Database handler: connection lifecycle, schema bootstrap, and the CRUD
//! surface.
//!
//! Every operation opens a fresh short-lived connection, applies the three
//! mandatory pragmas, does its work inside one transaction scope, and
//! releases the connection on every exit path by RAII — a dropped
//! transaction rolls back, a dropped connection closes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::instrument;

use crate::config::HandlerConfig;
use crate::query::{
    Filters, SelectQuery, add_column_statement, delete_statement, drop_table_statement,
    insert_statement, update_statement,
};
use crate::value::{Row, RowData, SqlValue};
use crate::{Error, Result};

/// A handle to one `SQLite` database plus its bootstrap schema and backup
/// policy.
///
/// Construction runs the schema script once; afterwards each operation is
/// independent and synchronous. Mutating operations silently no-op when
/// given an empty table name or an empty payload.
#[derive(Debug)]
pub struct Handler {
    config: HandlerConfig,
}

impl Handler {
    /// Opens the database and runs the bootstrap schema script once.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema file cannot be read or the script
    /// fails to execute.
    pub fn new(config: HandlerConfig) -> Result<Self> {
        let handler = Self { config };
        handler.run_schema()?;
        Ok(handler)
    }

    /// The immutable configuration this handler was built with.
    #[must_use]
    pub const fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Reads and executes the bootstrap schema as a batch script.
    fn run_schema(&self) -> Result<()> {
        let script = fs::read_to_string(self.config.schema())
            .map_err(|e| Error::io("read_schema", e))?;
        let conn = self.connect()?;
        conn.execute_batch(&script)?;
        Ok(())
    }

    /// Opens a short-lived connection with the mandatory pragmas applied.
    ///
    /// `journal_mode` returns the resulting mode as a row, which would trip
    /// `pragma_update`'s error path on some builds; the result is ignored.
    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(self.config.database())?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(conn)
    }

    /// Executes a batch of statements inside one transaction scope.
    ///
    /// An empty batch performs no engine call at all. On error the dropped
    /// transaction rolls the whole scope back.
    fn execute_batch(&self, statements: &[String]) -> Result<()> {
        if statements.is_empty() {
            return Ok(());
        }
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        for sql in statements {
            tx.execute(sql, [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Runs a query and collects rows, sharing the column list across rows.
    ///
    /// `limit` of `None` or `Some(0)` fetches all rows.
    fn query_rows(&self, sql: &str, limit: Option<usize>) -> Result<Vec<Row>> {
        let limit = limit.filter(|&n| n > 0);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .iter()
            .map(|c| (*c).to_string())
            .collect::<Vec<_>>()
            .into();
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: rusqlite::types::Value = row.get(i)?;
                values.push(SqlValue::from(value));
            }
            result.push(Row::new(Arc::clone(&columns), values));
            if limit.is_some_and(|n| result.len() >= n) {
                break;
            }
        }
        Ok(result)
    }

    /// Inserts a batch of rows.
    ///
    /// Empty payloads are filtered out of the batch before statements are
    /// built. If the raw batch size exceeds the configured threshold, a
    /// backup is created before the insert executes. With `ignore`, each
    /// statement is rendered `INSERT OR IGNORE`.
    ///
    /// # Errors
    ///
    /// Propagates engine errors and backup failures.
    #[instrument(skip(self, rows), fields(batch = rows.len()))]
    pub fn row_insert(&self, table: &str, rows: &[RowData], ignore: bool) -> Result<()> {
        if table.is_empty() {
            tracing::debug!("empty table name, skipping insert");
            return Ok(());
        }
        if rows.len() > self.config.threshold() {
            self.backup_create()?;
        }
        let statements: Vec<String> = rows
            .iter()
            .filter(|data| !data.is_empty())
            .map(|data| insert_statement(table, data, ignore))
            .collect();
        self.execute_batch(&statements)
    }

    /// Inserts a single row (batch of one).
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn row_insert_one(&self, table: &str, data: &RowData, ignore: bool) -> Result<()> {
        self.row_insert(table, std::slice::from_ref(data), ignore)
    }

    /// Updates rows matching the filters.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self, data, filters))]
    pub fn row_update(&self, table: &str, data: &RowData, filters: &Filters) -> Result<()> {
        if table.is_empty() || data.is_empty() {
            tracing::debug!("empty table name or payload, skipping update");
            return Ok(());
        }
        self.execute_batch(&[update_statement(table, data, filters)])
    }

    /// Deletes rows matching the filters.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self, filters))]
    pub fn row_delete(&self, table: &str, filters: &Filters) -> Result<()> {
        if table.is_empty() {
            tracing::debug!("empty table name, skipping delete");
            return Ok(());
        }
        self.execute_batch(&[delete_statement(table, filters)])
    }

    /// Drops the named tables, batched into one execution call.
    ///
    /// Empty names are skipped.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self))]
    pub fn table_drop(&self, tables: &[&str]) -> Result<()> {
        let statements: Vec<String> = tables
            .iter()
            .filter(|table| !table.is_empty())
            .map(|table| drop_table_statement(table))
            .collect();
        self.execute_batch(&statements)
    }

    /// Adds a column to an existing table.
    ///
    /// The type is upper-cased; the default is rendered only when given.
    /// No-ops when table, column, or type is empty.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self, default))]
    pub fn column_add(
        &self,
        table: &str,
        column: &str,
        sql_type: &str,
        default: Option<SqlValue>,
    ) -> Result<()> {
        if table.is_empty() || column.is_empty() || sql_type.is_empty() {
            tracing::debug!("empty identifier, skipping column add");
            return Ok(());
        }
        self.execute_batch(&[add_column_statement(table, column, sql_type, default.as_ref())])
    }

    /// Column names of a table in schema order, or `None` for an unknown
    /// table.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn column_names(&self, table: &str) -> Result<Option<Vec<String>>> {
        let info = self.table_info(table)?;
        if info.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            info.iter()
                .filter_map(|row| row.get("name").and_then(SqlValue::as_text))
                .map(ToString::to_string)
                .collect(),
        ))
    }

    /// Column names grouped by the value of one `table_info` field
    /// (consecutive grouping), or `None` for an unknown table.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn column_groups(
        &self,
        table: &str,
        key: &str,
    ) -> Result<Option<Vec<(SqlValue, Vec<String>)>>> {
        let info = self.table_info(table)?;
        if info.is_empty() {
            return Ok(None);
        }
        let mut groups: Vec<(SqlValue, Vec<String>)> = Vec::new();
        for row in &info {
            let group_key = row.get(key).cloned().unwrap_or(SqlValue::Null);
            let Some(name) = row.get("name").and_then(SqlValue::as_text) else {
                continue;
            };
            match groups.last_mut() {
                Some((current, names)) if *current == group_key => {
                    names.push(name.to_string());
                },
                _ => groups.push((group_key, vec![name.to_string()])),
            }
        }
        Ok(Some(groups))
    }

    fn table_info(&self, table: &str) -> Result<Vec<Row>> {
        self.query_rows(&format!("PRAGMA table_info({table});"), None)
    }

    /// Runs a structured query and returns its rows.
    ///
    /// `limit` of `None` or `Some(0)` fetches all rows.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self, query))]
    pub fn fetch(&self, query: &SelectQuery, limit: Option<usize>) -> Result<Vec<Row>> {
        self.query_rows(&query.build(), limit)
    }

    /// Fetches every row of one table (`SELECT * FROM {table};`).
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn fetch_all(&self, table: &str) -> Result<Vec<Row>> {
        self.query_rows(&format!("SELECT * FROM {table};"), None)
    }

    /// Counts rows matching a structured query via `SELECT COUNT(*)`.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    #[instrument(skip(self, query))]
    pub fn count(&self, query: &SelectQuery) -> Result<u64> {
        let rows = self.query_rows(&query.build_count(), None)?;
        Ok(rows
            .first()
            .and_then(|row| row.values().first())
            .and_then(SqlValue::as_integer)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0))
    }

    /// Exports a structured query as a CSV file: one header record of column
    /// names, then one record per row.
    ///
    /// # Errors
    ///
    /// Propagates engine errors and CSV write failures.
    #[instrument(skip(self, query), fields(path = %path.display()))]
    pub fn export_csv(&self, path: &Path, query: &SelectQuery) -> Result<()> {
        let sql = query.build();
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&columns)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: rusqlite::types::Value = row.get(i)?;
                record.push(SqlValue::from(value).to_csv_field());
            }
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|e| Error::io("flush_csv", e))?;
        Ok(())
    }
}
