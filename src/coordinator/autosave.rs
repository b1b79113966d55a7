// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(150);

/// Debounce timer with at most one pending deadline.
///
/// Every `schedule` restarts the quiet period. The owner polls `take_due` (usually after
/// `wait_for(deadline)` resolves); a cancelled deadline never fires.
#[derive(Debug, Clone)]
pub struct Autosave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        if self.deadline.is_some() {
            debug!(delay_ms = self.delay.as_millis() as u64, "autosave rescheduled");
        } else {
            debug!(delay_ms = self.delay.as_millis() as u64, "autosave scheduled");
        }
        self.deadline = Some(deadline);
        deadline
    }

    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Clears and reports a deadline that has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Resolves at `deadline`, or never when there is none. Meant as a `tokio::select!` branch.
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
