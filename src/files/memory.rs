// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Capability, FileError, FileHost, FileTarget};

/// Scripted answer to the next chooser interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Choose(PathBuf),
    Cancel,
    Fail(String),
}

/// In-memory host with scripted choosers. Clones share state. An empty reply queue cancels.
#[derive(Debug, Clone)]
pub struct MemoryFileHost {
    capability: Capability,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    save_replies: VecDeque<Reply>,
    open_replies: VecDeque<Reply>,
    suggested_names: Vec<String>,
    files: BTreeMap<PathBuf, String>,
    chooser_calls: usize,
    writes: usize,
    fail_writes: bool,
}

impl Default for MemoryFileHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileHost {
    pub fn new() -> Self {
        Self {
            capability: Capability::Supported,
            inner: Arc::default(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            capability: Capability::Unsupported,
            inner: Arc::default(),
        }
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.lock().files.insert(path.into(), contents.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_save_reply(&self, reply: Reply) {
        self.lock().save_replies.push_back(reply);
    }

    pub fn push_open_reply(&self, reply: Reply) {
        self.lock().open_replies.push_back(reply);
    }

    pub fn file(&self, path: impl Into<PathBuf>) -> Option<String> {
        self.lock().files.get(&path.into()).cloned()
    }

    pub fn suggested_names(&self) -> Vec<String> {
        self.lock().suggested_names.clone()
    }

    pub fn chooser_calls(&self) -> usize {
        self.lock().chooser_calls
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

fn answer(reply: Option<Reply>) -> Result<Option<FileTarget>, FileError> {
    match reply {
        Some(Reply::Choose(path)) => Ok(Some(FileTarget::new(path))),
        Some(Reply::Cancel) | None => Ok(None),
        Some(Reply::Fail(message)) => Err(FileError::Chooser { message }),
    }
}

#[async_trait]
impl FileHost for MemoryFileHost {
    fn capability(&self) -> Capability {
        self.capability
    }

    async fn choose_save_target(
        &self,
        suggested_name: &str,
    ) -> Result<Option<FileTarget>, FileError> {
        let mut inner = self.lock();
        inner.chooser_calls += 1;
        inner.suggested_names.push(suggested_name.to_owned());
        answer(inner.save_replies.pop_front())
    }

    async fn choose_open_target(&self) -> Result<Option<FileTarget>, FileError> {
        let mut inner = self.lock();
        inner.chooser_calls += 1;
        answer(inner.open_replies.pop_front())
    }

    async fn read(&self, target: &FileTarget) -> Result<String, FileError> {
        self.lock()
            .files
            .get(target.path())
            .cloned()
            .ok_or_else(|| FileError::Io {
                path: target.path().to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }

    async fn write(&self, target: &FileTarget, contents: &str) -> Result<(), FileError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(FileError::Io {
                path: target.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "write refused"),
            });
        }
        inner
            .files
            .insert(target.path().to_path_buf(), contents.to_owned());
        inner.writes += 1;
        Ok(())
    }
}
