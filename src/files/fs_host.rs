// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{Capability, FileError, FileHost, FileTarget};
use crate::store::{write_atomic, WriteDurability};

/// The operator-facing half of a file dialog.
#[async_trait]
pub trait PathChooser: Send + Sync {
    /// `Ok(None)` when the operator cancels.
    async fn choose_save_path(&self, suggested_name: &str) -> Result<Option<PathBuf>, FileError>;

    /// `Ok(None)` when the operator cancels.
    async fn choose_open_path(&self) -> Result<Option<PathBuf>, FileError>;
}

/// Local filesystem host. Without a chooser the host reports `Capability::Unsupported`.
#[derive(Debug, Clone)]
pub struct FsFileHost<C> {
    chooser: Option<C>,
    durability: WriteDurability,
}

impl<C: PathChooser> FsFileHost<C> {
    pub fn new(chooser: Option<C>) -> Self {
        Self {
            chooser,
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    fn chooser(&self, operation: &'static str) -> Result<&C, FileError> {
        self.chooser
            .as_ref()
            .ok_or(FileError::Unsupported { operation })
    }
}

#[async_trait]
impl<C: PathChooser> FileHost for FsFileHost<C> {
    fn capability(&self) -> Capability {
        if self.chooser.is_some() {
            Capability::Supported
        } else {
            Capability::Unsupported
        }
    }

    async fn choose_save_target(
        &self,
        suggested_name: &str,
    ) -> Result<Option<FileTarget>, FileError> {
        let path = self.chooser("save")?.choose_save_path(suggested_name).await?;
        Ok(path.map(FileTarget::new))
    }

    async fn choose_open_target(&self) -> Result<Option<FileTarget>, FileError> {
        let path = self.chooser("open")?.choose_open_path().await?;
        Ok(path.map(FileTarget::new))
    }

    async fn read(&self, target: &FileTarget) -> Result<String, FileError> {
        tokio::fs::read_to_string(target.path())
            .await
            .map_err(|source| FileError::Io {
                path: target.path().to_path_buf(),
                source,
            })
    }

    async fn write(&self, target: &FileTarget, contents: &str) -> Result<(), FileError> {
        let path = target.path().to_path_buf();
        let contents = contents.as_bytes().to_vec();
        let durability = self.durability;
        let join_path = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents, durability))
            .await
            .map_err(|err| FileError::Io {
                path: join_path,
                source: io::Error::other(err),
            })?
            .map_err(|source| FileError::Write { source })
    }
}
