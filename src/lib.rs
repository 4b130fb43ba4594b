//! # Litewrap
//!
//! A thin convenience layer over an embedded `SQLite` database.
//!
//! Litewrap opens short-lived connections, runs a bootstrap schema once at
//! construction, assembles SQL statements from structured parameters, and
//! keeps rotating, timestamped backups of the live database file.
//!
//! ## Features
//!
//! - Pure statement builders for `WHERE` predicate fragments
//! - Structured `SELECT` assembly with explicit clause ordering
//! - CRUD surface with silent no-ops for empty identifiers/payloads
//! - Engine-native backup snapshots with retention-based rotation
//! - CSV export of arbitrary query results
//!
//! ## Example
//!
//! ```rust,ignore
//! use litewrap::{Handler, HandlerConfig, RowData, SelectQuery, statement};
//!
//! let config = HandlerConfig::new("app.db", "schema.sql");
//! let handler = Handler::new(config)?;
//!
//! handler.row_insert_one("users", &RowData::new().with("name", "ada"), false)?;
//! let rows = handler.fetch(
//!     &SelectQuery::table("users").filter("name", statement::eq("ada")),
//!     None,
//! )?;
//! ```
//!
//! ## Security
//!
//! Litewrap generates SQL by string concatenation and does **not** escape or
//! parametrize values. Callers must sanitize any untrusted input before it
//! reaches the statement builders or the handler.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error as ThisError;

// Module declarations
pub mod backup;
pub mod config;
pub mod handler;
pub mod query;
pub mod statement;
pub mod value;

// Re-exports for convenience
pub use config::HandlerConfig;
pub use handler::Handler;
pub use query::{Filters, OrderBy, OrderDir, SelectQuery};
pub use value::{Row, RowData, SqlValue};

/// Error type for litewrap operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `BackupNotFound` | Restoring or deleting a backup path that does not exist |
/// | `BackupUntrusted` | A backup's permission bits differ from the live database's |
/// | `Sqlite` | Any failure raised by the engine during execute/fetch |
/// | `Io` | Filesystem operations fail (schema read, backup rotation) |
/// | `Csv` | CSV export cannot write to the target file |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A backup file was not found on disk.
    ///
    /// Raised when `backup_restore` or `backup_delete` is given a path that
    /// is not a regular file.
    #[error("backup not found: {}", path.display())]
    BackupNotFound {
        /// The missing backup path.
        path: PathBuf,
    },

    /// A backup file failed the provenance check.
    ///
    /// Raised when a backup's permission bits do not match the live
    /// database's. The file is treated as foreign or corrupted and is never
    /// restored or deleted.
    #[error("backup permissions do not match live database: {}", path.display())]
    BackupUntrusted {
        /// The rejected backup path.
        path: PathBuf,
    },

    /// An error raised by the `SQLite` engine.
    ///
    /// Propagated unchanged: connection failures, constraint violations, and
    /// syntax errors from malformed identifiers all surface here.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A filesystem operation failed.
    #[error("i/o error during {operation}: {source}")]
    Io {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// CSV export failed.
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Wraps an I/O error with the operation that raised it.
    pub(crate) fn io(operation: &str, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.to_string(),
            source,
        }
    }
}

/// Result type alias for litewrap operations.
pub type Result<T> = std::result::Result<T, Error>;
