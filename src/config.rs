// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration.
//!
//! Defaults can be overridden through the environment:
//!
//! - `QUOTE_INTAKE_DIR`: data directory for the local working copy.
//! - `QUOTE_INTAKE_AUTOSAVE_MS`: autosave quiet period in milliseconds.
//! - `QUOTE_INTAKE_DURABLE_WRITES`: `1/true/yes/on` or `0/false/no/off`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::coordinator::DEFAULT_AUTOSAVE_DELAY;
use crate::store::WriteDurability;

pub const DEFAULT_STORAGE_KEY: &str = "quote_intake_v3";

/// Keys earlier releases stored the working copy under, newest first.
pub const LEGACY_STORAGE_KEYS: &[&str] = &["quote_intake_v2"];

pub const ENV_DATA_DIR: &str = "QUOTE_INTAKE_DIR";
pub const ENV_AUTOSAVE_MS: &str = "QUOTE_INTAKE_AUTOSAVE_MS";
pub const ENV_DURABLE_WRITES: &str = "QUOTE_INTAKE_DURABLE_WRITES";

const APP_DIR_NAME: &str = "quote-intake";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub autosave_delay: Duration,
    pub durability: WriteDurability,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            durability: WriteDurability::default(),
        }
    }
}

/// Platform local-data directory joined with `quote-intake`, or `./.quote-intake` when the
/// platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { var, value } => write!(f, "invalid value for {var}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = get(ENV_AUTOSAVE_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ENV_AUTOSAVE_MS,
                    value: raw.clone(),
                })?;
            config.autosave_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = get(ENV_DURABLE_WRITES) {
            let durable = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                var: ENV_DURABLE_WRITES,
                value: raw.clone(),
            })?;
            config.durability = if durable {
                WriteDurability::Durable
            } else {
                WriteDurability::BestEffort
            };
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
