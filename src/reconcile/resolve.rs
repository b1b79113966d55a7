// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value;
use tracing::debug;

use super::lookup::{count, text, At};
use super::{Migration, ReconcileReport};

/// Applies "current path, then prior paths, then default" and records every fallback taken.
pub(super) struct Resolver<'r> {
    report: &'r mut ReconcileReport,
}

impl<'r> Resolver<'r> {
    pub(super) fn new(report: &'r mut ReconcileReport) -> Self {
        Self { report }
    }

    pub(super) fn report(&mut self) -> &mut ReconcileReport {
        self.report
    }

    pub(super) fn text(&mut self, current: At<'_>, prior: &[At<'_>]) -> String {
        self.first(current, prior, text).unwrap_or_default()
    }

    pub(super) fn count(&mut self, current: At<'_>, prior: &[At<'_>]) -> Option<u64> {
        self.first(current, prior, count)
    }

    pub(super) fn first<'v, T>(
        &mut self,
        current: At<'v>,
        prior: &[At<'v>],
        read: impl Fn(&'v Value) -> Option<T>,
    ) -> Option<T> {
        if let Some(found) = current.value().and_then(&read) {
            return Some(found);
        }
        for at in prior {
            if let Some(found) = at.value().and_then(&read) {
                self.migrated(at.path(), current.path());
                return Some(found);
            }
        }
        None
    }

    pub(super) fn migrated(&mut self, from: String, to: String) {
        debug!(%from, %to, "migrated field from prior location");
        self.report.migrations.push(Migration { from, to });
    }
}
