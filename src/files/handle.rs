// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::{Capability, FileError, FileHost, FileTarget};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HandleState {
    #[default]
    Unbound,
    Bound(FileTarget),
}

/// Tracks the bound write target.
///
/// - `Unbound -> Bound` on a completed `save_as` or an explicit `bind` after a successful open.
/// - `Bound -> Unbound` on `unbind`.
/// - A cancelled chooser leaves the state untouched.
/// - Without host capability every request fails with `FileError::Unsupported` and the host is
///   never asked.
#[derive(Debug)]
pub struct FileHandleManager<H> {
    host: H,
    capability: Capability,
    state: HandleState,
}

impl<H: FileHost> FileHandleManager<H> {
    pub fn new(host: H) -> Self {
        let capability = host.capability();
        debug!(?capability, "file host capability detected");
        Self {
            host,
            capability,
            state: HandleState::Unbound,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn state(&self) -> &HandleState {
        &self.state
    }

    pub fn bound(&self) -> Option<&FileTarget> {
        match &self.state {
            HandleState::Bound(target) => Some(target),
            HandleState::Unbound => None,
        }
    }

    pub fn bind(&mut self, target: FileTarget) {
        self.state = HandleState::Bound(target);
    }

    pub fn unbind(&mut self) {
        self.state = HandleState::Unbound;
    }

    fn require(&self, operation: &'static str) -> Result<(), FileError> {
        match self.capability {
            Capability::Supported => Ok(()),
            Capability::Unsupported => Err(FileError::Unsupported { operation }),
        }
    }

    /// Writes to the bound target, or behaves like `save_as` when unbound.
    pub async fn save(
        &mut self,
        contents: &str,
        suggested_name: &str,
    ) -> Result<Option<FileTarget>, FileError> {
        self.require("save")?;
        match &self.state {
            HandleState::Bound(target) => {
                self.host.write(target, contents).await?;
                Ok(Some(target.clone()))
            }
            HandleState::Unbound => self.save_as(contents, suggested_name).await,
        }
    }

    /// Asks for a new target, writes it, and binds it. `Ok(None)` when cancelled.
    pub async fn save_as(
        &mut self,
        contents: &str,
        suggested_name: &str,
    ) -> Result<Option<FileTarget>, FileError> {
        self.require("save")?;
        let Some(target) = self.host.choose_save_target(suggested_name).await? else {
            debug!("save chooser cancelled");
            return Ok(None);
        };
        self.host.write(&target, contents).await?;
        self.bind(target.clone());
        Ok(Some(target))
    }

    /// Asks for a file and reads it without binding; the caller binds once the contents are
    /// accepted. `Ok(None)` when cancelled.
    pub async fn choose_and_read(&self) -> Result<Option<(FileTarget, String)>, FileError> {
        self.require("open")?;
        let Some(target) = self.host.choose_open_target().await? else {
            debug!("open chooser cancelled");
            return Ok(None);
        };
        let text = self.host.read(&target).await?;
        Ok(Some((target, text)))
    }
}
