//! Backup lifecycle: timestamped snapshots, retention-based rotation, and
//! permission-checked restore/delete.
//!
//! Snapshots are written with the engine's online backup API (source
//! connection to destination connection), never a raw file copy, so a
//! database mid-write is copied consistently. Backup filenames embed a
//! microsecond timestamp; lexicographic filename order equals chronological
//! order.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::backup::Backup;
use tracing::instrument;

use crate::handler::Handler;
use crate::{Error, Result};

/// Pages copied per backup step.
const BACKUP_PAGES_PER_STEP: i32 = 64;
/// Pause between backup steps, letting concurrent writers through.
const BACKUP_STEP_PAUSE: Duration = Duration::from_millis(50);
/// Timestamp format embedded in backup filenames (microsecond precision).
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

impl Handler {
    /// Creates a new backup snapshot, rotating out the oldest one when the
    /// retention cap is reached.
    ///
    /// Existing backups are sorted ascending by filename (chronological); if
    /// the count is already at or above the retention cap, the single oldest
    /// is deleted before the new snapshot is written. Under a retention of
    /// zero this still leaves the one snapshot just written.
    ///
    /// Returns the path of the new snapshot.
    ///
    /// # Errors
    ///
    /// Propagates engine errors from the backup copy and I/O errors from
    /// rotation.
    #[instrument(skip(self))]
    pub fn backup_create(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
        let name = format!(
            "{}{stamp}{}",
            self.config().backup_prefix(),
            self.config().backup_suffix()
        );
        let path = self.config().backup_dir().join(name);

        let mut existing = self.backup_list()?;
        existing.sort();
        if existing.len() >= self.config().retention() {
            if let Some(oldest) = existing.first() {
                tracing::debug!(path = %oldest.display(), "evicting oldest backup");
                fs::remove_file(oldest).map_err(|e| Error::io("evict_backup", e))?;
            }
        }

        let src = Connection::open(self.config().database())?;
        let mut dst = Connection::open(&path)?;
        {
            let backup = Backup::new(&src, &mut dst)?;
            backup.run_to_completion(BACKUP_PAGES_PER_STEP, BACKUP_STEP_PAUSE, None)?;
        }
        tracing::debug!(path = %path.display(), "backup written");
        Ok(path)
    }

    /// Lists this database's backup files in directory scan order.
    ///
    /// The list is finite and restartable; callers wanting chronological
    /// order sort by filename.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the backup directory cannot be read.
    pub fn backup_list(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(self.config().backup_dir())
            .map_err(|e| Error::io("list_backups", e))?;
        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("list_backups", e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(self.config().backup_prefix())
                && name.ends_with(self.config().backup_suffix())
            {
                matches.push(entry.path());
            }
        }
        Ok(matches)
    }

    /// Restores the live database from a backup file, replacing it
    /// atomically.
    ///
    /// # Errors
    ///
    /// [`Error::BackupNotFound`] if the path is not a regular file;
    /// [`Error::BackupUntrusted`] if its permission bits differ from the
    /// live database's. The live database is untouched on failure.
    #[instrument(skip(self), fields(backup = %backup.display()))]
    pub fn backup_restore(&self, backup: &Path) -> Result<()> {
        self.backup_check(backup)?;
        fs::rename(backup, self.config().database()).map_err(|e| Error::io("restore_backup", e))
    }

    /// Deletes a backup file after the same provenance check as restore.
    ///
    /// # Errors
    ///
    /// [`Error::BackupNotFound`] if the path is not a regular file;
    /// [`Error::BackupUntrusted`] on a permission-bit mismatch.
    #[instrument(skip(self), fields(backup = %backup.display()))]
    pub fn backup_delete(&self, backup: &Path) -> Result<()> {
        self.backup_check(backup)?;
        fs::remove_file(backup).map_err(|e| Error::io("delete_backup", e))
    }

    /// Cheap provenance check: the file must exist and its permission bits
    /// must match the live database's. This guards against foreign or
    /// corrupted files, not against content tampering.
    fn backup_check(&self, backup: &Path) -> Result<()> {
        if !backup.is_file() {
            return Err(Error::BackupNotFound {
                path: backup.to_path_buf(),
            });
        }
        let live = fs::metadata(self.config().database())
            .map_err(|e| Error::io("stat_database", e))?;
        let candidate = fs::metadata(backup).map_err(|e| Error::io("stat_backup", e))?;
        if live.permissions() != candidate.permissions() {
            return Err(Error::BackupUntrusted {
                path: backup.to_path_buf(),
            });
        }
        Ok(())
    }
}
