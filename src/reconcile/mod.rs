// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reconciliation of arbitrary JSON into the canonical state.
//!
//! `reconcile` is total: `null`, arrays, prior-version documents and partially corrupt documents
//! all produce a complete `CanonicalState`. Fields that cannot be interpreted take their
//! defaults, unknown fields are dropped, `meta.version` is stamped to the running version and
//! `meta.updatedAt` to the reconciliation instant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::{CanonicalState, Meta, Tab, SCHEMA_VERSION};

mod groups;
mod lookup;
mod resolve;

use lookup::{count, object};
use resolve::Resolver;

/// A field read from a prior location and written to its canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub from: String,
    pub to: String,
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Drivers,
    Vehicles,
}

impl RowKind {
    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::Drivers => "drivers",
            Self::Vehicles => "vehicles",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub migrations: Vec<Migration>,
    /// Counts that were absent and taken from the list length.
    pub derived_counts: Vec<RowKind>,
    /// Counts that exceeded `MAX_ROWS`.
    pub clamped_counts: Vec<RowKind>,
    /// `meta.version` as declared by the input, if readable.
    pub declared_version: Option<u64>,
}

impl ReconcileReport {
    pub fn is_newer_schema(&self) -> bool {
        self.declared_version
            .is_some_and(|version| version > u64::from(SCHEMA_VERSION))
    }

    /// Nothing was read from a prior location, derived, or clamped.
    pub fn is_clean(&self) -> bool {
        self.migrations.is_empty() && self.derived_counts.is_empty() && self.clamped_counts.is_empty()
    }
}

pub fn reconcile(document: &Value) -> CanonicalState {
    reconcile_at(document, Utc::now())
}

pub fn reconcile_at(document: &Value, now: DateTime<Utc>) -> CanonicalState {
    reconcile_with_report(document, now).0
}

pub fn reconcile_with_report(
    document: &Value,
    now: DateTime<Utc>,
) -> (CanonicalState, ReconcileReport) {
    let mut report = ReconcileReport::default();
    let root = object(document);

    report.declared_version = root
        .and_then(|root| lookup::child(Some(root), "meta"))
        .and_then(|meta| meta.get("version"))
        .and_then(count);
    if report.is_newer_schema() {
        warn!(
            declared = report.declared_version,
            supported = SCHEMA_VERSION,
            "document declares a newer schema version; matching known fields only"
        );
    }

    let mut r = Resolver::new(&mut report);
    let customer = groups::customer(&mut r, root);
    let auto = groups::auto(&mut r, root);
    let home = groups::home(&mut r, root);
    let business = groups::business(&mut r, root);

    let last_active_tab = root
        .and_then(|root| root.get("lastActiveTab"))
        .and_then(Value::as_str)
        .and_then(Tab::parse)
        .unwrap_or_default();

    let mut state = CanonicalState {
        customer,
        auto,
        home,
        business,
        meta: Meta {
            version: SCHEMA_VERSION,
            updated_at: now,
        },
        last_active_tab,
    };
    state.normalize();

    if !report.is_clean() {
        info!(
            migrations = report.migrations.len(),
            derived_counts = report.derived_counts.len(),
            clamped_counts = report.clamped_counts.len(),
            declared_version = report.declared_version,
            "reconciled document from a prior shape"
        );
    }

    (state, report)
}

#[cfg(test)]
mod tests;
