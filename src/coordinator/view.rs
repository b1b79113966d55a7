// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::CanonicalState;

/// The view glue seen from the coordinator.
pub trait ViewSnapshot: Send {
    /// Folds values the view holds but has not committed yet into `state`. Called immediately
    /// before every serialization.
    fn capture(&mut self, state: &mut CanonicalState);

    /// Receives the state after it was replaced (load, import, open, new intake).
    fn render(&mut self, _state: &CanonicalState) {}
}

/// A view that edits canonical state directly and keeps nothing of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedView;

impl ViewSnapshot for DetachedView {
    fn capture(&mut self, _state: &mut CanonicalState) {}
}
