//! Value and row types shared by the statement builders and the handler.
//!
//! [`SqlValue`] carries two renderings: the SQL-literal form used when
//! assembling statement text, and a plain form used for CSV fields. Neither
//! escapes anything beyond blob hex encoding — callers sanitize untrusted
//! input before it reaches statement assembly.

use std::fmt;
use std::sync::Arc;

/// A typed scalar that can appear in generated SQL text or a fetched row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// A signed integer.
    Integer(i64),
    /// A floating-point number.
    Real(f64),
    /// A text value (rendered single-quoted in SQL, verbatim otherwise).
    Text(String),
    /// A binary blob (rendered as an `X'…'` hex literal in SQL).
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Renders the value as a plain string for CSV fields.
    ///
    /// `Null` becomes the empty field, text is written verbatim, and blobs
    /// are hex-encoded.
    #[must_use]
    pub fn to_csv_field(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Text(t) => t.clone(),
            Self::Blob(b) => hex::encode(b),
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the real payload, if any.
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Renders the SQL-literal form: `NULL`, `42`, `4.5`, `'text'`, `X'AB'`.
///
/// Text is quoted but not escaped; embedded quotes are the caller's problem
/// (documented crate-wide limitation).
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(t) => write!(f, "'{t}'"),
            Self::Blob(b) => write!(f, "X'{}'", hex::encode_upper(b)),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<rusqlite::types::Value> for SqlValue {
    fn from(v: rusqlite::types::Value) -> Self {
        match v {
            rusqlite::types::Value::Null => Self::Null,
            rusqlite::types::Value::Integer(i) => Self::Integer(i),
            rusqlite::types::Value::Real(r) => Self::Real(r),
            rusqlite::types::Value::Text(t) => Self::Text(t),
            rusqlite::types::Value::Blob(b) => Self::Blob(b),
        }
    }
}

/// An ordered column-to-value payload for `INSERT` and `UPDATE` statements.
///
/// Insertion order is preserved: the rendered column list and value list
/// correspond positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowData(Vec<(String, SqlValue)>);

impl RowData {
    /// Creates an empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a column/value pair, preserving order.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.0.push((column.into(), value.into()));
        self
    }

    /// Returns `true` when the payload has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of column/value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, SqlValue)> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a RowData {
    type Item = &'a (String, SqlValue);
    type IntoIter = std::slice::Iter<'a, (String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A fetched row: an ordered mapping from column name to [`SqlValue`].
///
/// Column order follows the select/schema order; the column list is shared
/// across all rows of one query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Builds a row from a shared column list and positional values.
    #[must_use]
    pub const fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Looks up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Column names in select order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_literal_rendering() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::from(42).to_string(), "42");
        assert_eq!(SqlValue::from(4.5).to_string(), "4.5");
        assert_eq!(SqlValue::from("x").to_string(), "'x'");
        assert_eq!(SqlValue::from(true).to_string(), "1");
        assert_eq!(SqlValue::from(false).to_string(), "0");
        assert_eq!(SqlValue::Blob(vec![0xAB, 0x01]).to_string(), "X'AB01'");
    }

    #[test]
    fn test_csv_rendering() {
        assert_eq!(SqlValue::Null.to_csv_field(), "");
        assert_eq!(SqlValue::from(42).to_csv_field(), "42");
        assert_eq!(SqlValue::from("x,y").to_csv_field(), "x,y");
        assert_eq!(SqlValue::Blob(vec![0xAB]).to_csv_field(), "ab");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(7)), SqlValue::Integer(7));
    }

    #[test]
    fn test_engine_value_conversion() {
        let v = rusqlite::types::Value::Text("hi".to_string());
        assert_eq!(SqlValue::from(v), SqlValue::Text("hi".to_string()));
        let v = rusqlite::types::Value::Null;
        assert!(SqlValue::from(v).is_null());
    }

    #[test]
    fn test_row_data_preserves_order() {
        let data = RowData::new().with("b", 1).with("a", "x");
        let cols: Vec<&str> = data.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cols, vec!["b", "a"]);
        assert_eq!(data.len(), 2);
        assert!(!data.is_empty());
    }

    #[test]
    fn test_row_lookup() {
        let columns: Arc<[String]> = Arc::from(vec!["a".to_string(), "b".to_string()]);
        let row = Row::new(
            columns,
            vec![SqlValue::Integer(1), SqlValue::Text("x".to_string())],
        );
        assert_eq!(row.get("a"), Some(&SqlValue::Integer(1)));
        assert_eq!(row.get("b").and_then(SqlValue::as_text), Some("x"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.columns(), &["a".to_string(), "b".to_string()]);
    }
}
