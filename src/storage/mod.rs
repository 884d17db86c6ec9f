//! Persistence of the last master volume
//!
//! The record is a single little-endian IEEE-754 `f32`, nothing else.
//! Callers treat every error as a reason to fall back, never as fatal.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Size of the volume record in bytes
pub const RECORD_SIZE: usize = std::mem::size_of::<f32>();

/// Errors from reading or writing the volume record
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("volume record {path:?} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("volume record {0:?} holds a non-finite value")]
    Corrupt(PathBuf),
}

/// Fixed-path store for the last volume
#[derive(Debug, Clone)]
pub struct VolumeStore {
    path: PathBuf,
}

impl VolumeStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the record path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored volume
    ///
    /// Only the first four bytes are read; a shorter file is an error.
    pub fn load(&self) -> Result<f32, StorageError> {
        let mut record = [0u8; RECORD_SIZE];

        File::open(&self.path)
            .and_then(|mut file| file.read_exact(&mut record))
            .map_err(|source| self.io_error(source))?;

        let value = f32::from_le_bytes(record);
        if !value.is_finite() {
            return Err(StorageError::Corrupt(self.path.clone()));
        }

        Ok(value)
    }

    /// Write the volume, creating the containing directory if needed
    pub fn save(&self, value: f32) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
        }

        File::create(&self.path)
            .and_then(|mut file| file.write_all(&value.to_le_bytes()))
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
