// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Durable key-value storage for the working copy.
//!
//! The coordinator only needs string values under string keys. `FileKeyValueStore` keeps one
//! JSON file per key in a data directory; `MemoryKeyValueStore` backs tests and demos.

use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

mod atomic;
mod file;
mod memory;

pub(crate) use atomic::write_atomic;
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// How hard a write tries to reach stable storage before reporting success.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Staged file plus rename; no fsync. Enough for the autosave cadence.
    #[default]
    BestEffort,

    /// Also fsyncs the staged file and, on unix, the containing directory.
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    InvalidKey { key: String },
    SymlinkRefused { path: PathBuf },
    Unavailable { key: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::InvalidKey { key } => {
                write!(f, "invalid storage key {key:?} (allowed: A-Z a-z 0-9 _ -)")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::Unavailable { key, reason } => {
                write!(f, "storage unavailable for {key:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidKey { .. } => None,
            Self::SymlinkRefused { .. } => None,
            Self::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests;
