//! Sandbox persistence layer
//!
//! Saves and loads the sandbox snapshot (mock host storage plus call
//! journal) as JSON, with atomic writes and rotating backups.

use crate::host::MockHost;
use crate::storage::journal::Journal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything the sandbox keeps between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub host: MockHost,
    #[serde(default)]
    pub journal: Journal,
}

impl Snapshot {
    pub fn new(host: MockHost) -> Self {
        Self {
            host,
            journal: Journal::default(),
        }
    }
}

/// Sandbox storage configuration
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub data_dir: PathBuf,
    pub snapshot_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ft_sandbox"),
            snapshot_file: "sandbox.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Snapshot storage manager
pub struct Storage {
    config: SandboxConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: SandboxConfig) -> Result<Self, StorageError> {
        if config.max_backups == 0 && config.backup_enabled {
            return Err(StorageError::InvalidData(
                "max_backups must be at least 1 when backups are enabled".to_string(),
            ));
        }
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.snapshot_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.snapshot_file, index))
    }

    /// Save the snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let path = self.snapshot_path();

        if self.config.backup_enabled && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("sandbox.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, snapshot)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("Saved sandbox snapshot to {:?}", path);
        Ok(())
    }

    /// Load the snapshot from disk
    pub fn load(&self) -> Result<Snapshot, StorageError> {
        let path = self.snapshot_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Sandbox snapshot not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Check if a saved snapshot exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<Snapshot, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let path = self.snapshot_path();

        let file_size = if path.exists() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        Ok(StorageStats {
            file_size,
            backup_count: self.list_backups().len(),
            data_dir: self.config.data_dir.clone(),
        })
    }
}

/// Storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub file_size: u64,
    pub backup_count: usize,
    pub data_dir: PathBuf,
}

/// Save a snapshot to a specific file path
pub fn save_to_file(snapshot: &Snapshot, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

/// Load a snapshot from a specific file path
pub fn load_from_file(path: &Path) -> Result<Snapshot, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
