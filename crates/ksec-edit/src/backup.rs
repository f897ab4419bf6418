//! Timestamped snapshots of secret data

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use ksec_types::{Error, Result, SecretData};

use crate::codec;

/// File name for a backup of `name` in `namespace` taken at `at`
pub fn backup_file_name(name: &str, namespace: &str, at: DateTime<Local>) -> String {
    format!(
        "ksec-backup-{}-{}-{}.yaml",
        name,
        namespace,
        at.format("%Y%m%d-%H%M%S")
    )
}

/// Write `data` to a new backup file in `dir` and return its path
///
/// Refuses to overwrite an existing file so two backups taken within the same
/// second cannot clobber each other.
pub fn write_backup(dir: &Path, name: &str, namespace: &str, data: &SecretData) -> Result<PathBuf> {
    let path = dir.join(backup_file_name(name, namespace, Local::now()));

    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(codec::encode(data).as_bytes())?;
        file.sync_all()
    };

    write().map_err(|source| Error::BackupWriteFailed {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "Backup written");
    Ok(path)
}
