// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Operator-chosen file targets.
//!
//! A `FileHost` is whatever environment can ask the operator for a file and read or write it.
//! `FileHandleManager` tracks the zero-or-one bound target on top of a host.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::store::StoreError;

mod fs_host;
mod handle;
mod memory;
mod naming;

pub use fs_host::{FsFileHost, PathChooser};
pub use handle::{FileHandleManager, HandleState};
pub use memory::{MemoryFileHost, Reply};
pub use naming::suggested_filename;

/// An exclusive write target obtained from the operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Whether the host can run chooser interactions at all. Detected once per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Unsupported,
}

#[derive(Debug)]
pub enum FileError {
    Unsupported { operation: &'static str },
    Chooser { message: String },
    Io { path: PathBuf, source: io::Error },
    Write { source: StoreError },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { operation } => {
                write!(f, "file {operation} is not supported in this environment")
            }
            Self::Chooser { message } => write!(f, "file chooser failed: {message}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Write { source } => write!(f, "cannot write file: {source}"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Chooser { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Write { source } => Some(source),
        }
    }
}

#[async_trait]
pub trait FileHost: Send + Sync {
    fn capability(&self) -> Capability;

    /// `Ok(None)` when the operator cancels.
    async fn choose_save_target(&self, suggested_name: &str)
        -> Result<Option<FileTarget>, FileError>;

    /// `Ok(None)` when the operator cancels.
    async fn choose_open_target(&self) -> Result<Option<FileTarget>, FileError>;

    async fn read(&self, target: &FileTarget) -> Result<String, FileError>;

    async fn write(&self, target: &FileTarget, contents: &str) -> Result<(), FileError>;
}
