//! Handler configuration.
//!
//! The configuration is immutable after construction: the absolute retention
//! count, the backup directory, and the backup filename prefix/suffix are all
//! derived eagerly so no call path recomputes them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default number of backup files kept on disk.
const DEFAULT_RETENTION: i64 = 3;
/// Default batch size above which an insert triggers an automatic backup.
const DEFAULT_THRESHOLD: usize = 10;

/// Immutable configuration for a [`Handler`](crate::Handler).
///
/// Derived values (absolute retention, backup directory, backup filename
/// prefix and suffix) are computed once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawHandlerConfig")]
pub struct HandlerConfig {
    database: PathBuf,
    schema: PathBuf,
    retention: usize,
    threshold: usize,
    backup_dir: PathBuf,
    backup_prefix: String,
    backup_suffix: String,
}

/// Deserialization shape: retention may be negative and defaults apply.
#[derive(Debug, Deserialize)]
struct RawHandlerConfig {
    database: PathBuf,
    schema: PathBuf,
    #[serde(default = "default_retention")]
    retention: i64,
    #[serde(default = "default_threshold")]
    threshold: usize,
}

const fn default_retention() -> i64 {
    DEFAULT_RETENTION
}

const fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

impl From<RawHandlerConfig> for HandlerConfig {
    fn from(raw: RawHandlerConfig) -> Self {
        Self::new(raw.database, raw.schema)
            .with_retention(raw.retention)
            .with_threshold(raw.threshold)
    }
}

impl HandlerConfig {
    /// Creates a configuration with default retention (3) and threshold (10).
    ///
    /// # Examples
    ///
    /// ```
    /// use litewrap::HandlerConfig;
    ///
    /// let config = HandlerConfig::new("data/app.db", "data/schema.sql");
    /// assert_eq!(config.retention(), 3);
    /// assert_eq!(config.threshold(), 10);
    /// ```
    #[must_use]
    pub fn new(database: impl Into<PathBuf>, schema: impl Into<PathBuf>) -> Self {
        let database = database.into();
        let (backup_dir, backup_prefix, backup_suffix) = derive_backup_naming(&database);
        Self {
            database,
            schema: schema.into(),
            retention: absolute_retention(DEFAULT_RETENTION),
            threshold: DEFAULT_THRESHOLD,
            backup_dir,
            backup_prefix,
            backup_suffix,
        }
    }

    /// Sets the backup retention count.
    ///
    /// Negative input is folded to its absolute value.
    #[must_use]
    pub fn with_retention(mut self, retention: i64) -> Self {
        self.retention = absolute_retention(retention);
        self
    }

    /// Sets the row-count threshold that triggers an automatic backup on
    /// batch inserts.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Path to the live database file.
    #[must_use]
    pub fn database(&self) -> &Path {
        &self.database
    }

    /// Path to the bootstrap schema script.
    #[must_use]
    pub fn schema(&self) -> &Path {
        &self.schema
    }

    /// Number of backup files kept on disk (never negative).
    #[must_use]
    pub const fn retention(&self) -> usize {
        self.retention
    }

    /// Batch size above which `row_insert` creates a backup first.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Directory that holds backup files (the live database's directory).
    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Backup filename prefix: `{stem}_`.
    #[must_use]
    pub fn backup_prefix(&self) -> &str {
        &self.backup_prefix
    }

    /// Backup filename suffix: `{extension}.bak`.
    #[must_use]
    pub fn backup_suffix(&self) -> &str {
        &self.backup_suffix
    }
}

/// Folds a possibly-negative retention input to a non-negative count.
fn absolute_retention(retention: i64) -> usize {
    usize::try_from(retention.unsigned_abs()).unwrap_or(usize::MAX)
}

/// Derives the backup directory and filename prefix/suffix from the database
/// path. A bare filename resolves to the current directory.
fn derive_backup_naming(database: &Path) -> (PathBuf, String, String) {
    let dir = database
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let stem = database
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = database
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (dir, format!("{stem}_"), format!("{suffix}.bak"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::new("app.db", "schema.sql");
        assert_eq!(config.retention(), 3);
        assert_eq!(config.threshold(), 10);
        assert_eq!(config.database(), Path::new("app.db"));
        assert_eq!(config.schema(), Path::new("schema.sql"));
    }

    #[test]
    fn test_negative_retention_folded_to_absolute() {
        let config = HandlerConfig::new("app.db", "schema.sql").with_retention(-5);
        assert_eq!(config.retention(), 5);
    }

    #[test]
    fn test_backup_naming_derived_eagerly() {
        let config = HandlerConfig::new("data/app.db", "schema.sql");
        assert_eq!(config.backup_dir(), Path::new("data"));
        assert_eq!(config.backup_prefix(), "app_");
        assert_eq!(config.backup_suffix(), ".db.bak");
    }

    #[test]
    fn test_bare_filename_backs_up_to_current_dir() {
        let config = HandlerConfig::new("app.db", "schema.sql");
        assert_eq!(config.backup_dir(), Path::new("."));
    }

    #[test]
    fn test_no_extension() {
        let config = HandlerConfig::new("/var/lib/app", "schema.sql");
        assert_eq!(config.backup_prefix(), "app_");
        assert_eq!(config.backup_suffix(), ".bak");
    }

    #[test]
    fn test_deserialize_applies_defaults_and_absolute_retention() {
        let config: HandlerConfig = serde_json::from_str(
            r#"{"database": "app.db", "schema": "schema.sql", "retention": -2}"#,
        )
        .unwrap();
        assert_eq!(config.retention(), 2);
        assert_eq!(config.threshold(), 10);
    }
}
