// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Quote Intake: canonical schema reconciliation and local persistence for insurance quote
//! intake forms.
//!
//! - `model`: the canonical state and its defaults.
//! - `reconcile`: maps any prior (or corrupt) document shape onto the canonical state.
//! - `coordinator`: owns the state, debounced autosave, explicit save/open/import.
//! - `files` and `store`: the file-target and key-value seams the coordinator writes through.

pub mod config;
pub mod coordinator;
pub mod files;
pub mod model;
pub mod reconcile;
pub mod store;

pub use config::IntakeConfig;
pub use coordinator::{Coordinator, FileOutcome, IntakeError, SaveStatus};
pub use model::{default_state, CanonicalState};
pub use reconcile::{reconcile, ReconcileReport};
