// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::files::{FileError, FileTarget};
use crate::model::FieldError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum IntakeError {
    EmptyInput,
    InvalidJson { source: serde_json::Error },
    Serialize { source: serde_json::Error },
    Field(FieldError),
    File(FileError),
    Store(StoreError),
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("nothing to import: input is empty"),
            Self::InvalidJson { source } => write!(f, "invalid JSON: {source}"),
            Self::Serialize { source } => write!(f, "cannot serialize intake: {source}"),
            Self::Field(err) => write!(f, "{err}"),
            Self::File(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "local save failed: {err}"),
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyInput => None,
            Self::InvalidJson { source } => Some(source),
            Self::Serialize { source } => Some(source),
            Self::Field(err) => Some(err),
            Self::File(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<FieldError> for IntakeError {
    fn from(err: FieldError) -> Self {
        Self::Field(err)
    }
}

impl From<FileError> for IntakeError {
    fn from(err: FileError) -> Self {
        Self::File(err)
    }
}

impl From<StoreError> for IntakeError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Background save indicator. Autosave failures only ever show up here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Pending { label: String },
    SavedLocally,
    Failed { message: String },
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Pending { label } => f.write_str(label),
            Self::SavedLocally => f.write_str("Auto-saved locally"),
            Self::Failed { message } => write!(f, "Local save failed: {message}"),
        }
    }
}

/// Result of an explicit file operation. Cancellation is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Saved(FileTarget),
    Opened(FileTarget),
    Cancelled,
}

/// Where `load` found the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Current,
    Legacy { key: String },
    Empty,
    Unreadable,
}
