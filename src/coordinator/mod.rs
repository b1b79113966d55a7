// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence coordinator.
//!
//! Single owner of the canonical state. Every operation that awaits (store, chooser, file I/O)
//! runs on `&mut self`: it snapshots the state, awaits, then commits, so no other operation can
//! interleave with it. Explicit saves cancel the pending autosave before they snapshot.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{IntakeConfig, DEFAULT_STORAGE_KEY, LEGACY_STORAGE_KEYS};
use crate::files::{
    suggested_filename, Capability, FileHandleManager, FileHost, FileTarget, HandleState,
};
use crate::model::{default_state, CanonicalState, Tab};
use crate::reconcile::{reconcile_with_report, ReconcileReport};
use crate::store::KeyValueStore;

mod autosave;
mod error;
mod view;

pub use autosave::{wait_for, Autosave, DEFAULT_AUTOSAVE_DELAY};
pub use error::{FileOutcome, IntakeError, LoadSource, SaveStatus};
pub use view::{DetachedView, ViewSnapshot};

pub struct Coordinator<S, H, V = DetachedView> {
    state: CanonicalState,
    store: S,
    files: FileHandleManager<H>,
    view: V,
    autosave: Autosave,
    status: SaveStatus,
    storage_key: String,
    legacy_keys: Vec<String>,
    /// Set when the working copy came from a legacy key that still needs removing.
    legacy_cleanup: bool,
}

impl<S, H, V> Coordinator<S, H, V>
where
    S: KeyValueStore,
    H: FileHost,
    V: ViewSnapshot,
{
    pub fn new(store: S, host: H, view: V) -> Self {
        Self {
            state: default_state(),
            store,
            files: FileHandleManager::new(host),
            view,
            autosave: Autosave::default(),
            status: SaveStatus::Idle,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            legacy_keys: LEGACY_STORAGE_KEYS.iter().map(|key| (*key).to_owned()).collect(),
            legacy_cleanup: false,
        }
    }

    pub fn from_config(store: S, host: H, view: V, config: &IntakeConfig) -> Self {
        Self::new(store, host, view)
            .with_storage_key(config.storage_key.clone())
            .with_autosave_delay(config.autosave_delay)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_legacy_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.legacy_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave = Autosave::new(delay);
        self
    }

    pub fn state(&self) -> &CanonicalState {
        &self.state
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn handle_state(&self) -> &HandleState {
        self.files.state()
    }

    pub fn bound_file(&self) -> Option<&FileTarget> {
        self.files.bound()
    }

    pub fn file_capability(&self) -> Capability {
        self.files.capability()
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Reads the working copy from the store: the current key first, then each legacy key.
    ///
    /// Missing, unreadable or unparsable data leaves the default state in place. Nothing is
    /// written.
    pub async fn load(&mut self) -> LoadSource {
        let keys: Vec<String> = std::iter::once(self.storage_key.clone())
            .chain(self.legacy_keys.iter().cloned())
            .collect();

        let mut found = None;
        for (index, key) in keys.into_iter().enumerate() {
            match self.store.get(&key).await {
                Ok(Some(raw)) => {
                    found = Some((index, key, raw));
                    break;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(%key, error = %err, "cannot read stored intake; starting fresh");
                    self.state = default_state();
                    self.view.render(&self.state);
                    return LoadSource::Unreadable;
                }
            }
        }

        let Some((index, key, raw)) = found else {
            info!("no stored intake; starting fresh");
            self.state = default_state();
            self.view.render(&self.state);
            return LoadSource::Empty;
        };

        let document = match serde_json::from_str::<Value>(&raw) {
            Ok(document) => document,
            Err(err) => {
                warn!(%key, error = %err, "stored intake is not valid JSON; starting fresh");
                self.state = default_state();
                self.view.render(&self.state);
                return LoadSource::Unreadable;
            }
        };

        let (state, _report) = reconcile_with_report(&document, Utc::now());
        self.state = state;
        self.view.render(&self.state);

        if index == 0 {
            info!(%key, "restored stored intake");
            LoadSource::Current
        } else {
            info!(%key, "restored intake from legacy storage key");
            self.legacy_cleanup = true;
            LoadSource::Legacy { key }
        }
    }

    /// Records an edit and restarts the autosave quiet period.
    pub fn notify_edit(&mut self, label: impl Into<String>) {
        self.status = SaveStatus::Pending {
            label: label.into(),
        };
        self.autosave.schedule(Instant::now());
    }

    /// Applies `edit` to the state, then notifies.
    pub fn edit<T>(
        &mut self,
        label: impl Into<String>,
        edit: impl FnOnce(&mut CanonicalState) -> T,
    ) -> T {
        let out = edit(&mut self.state);
        self.notify_edit(label);
        out
    }

    pub fn set_field(&mut self, path: &str, value: &str) -> Result<(), IntakeError> {
        self.state.set_field(path, value)?;
        self.notify_edit("Changed");
        Ok(())
    }

    /// Runs the autosave if its deadline has elapsed. Failures only update the status.
    pub async fn flush_autosave(&mut self) -> bool {
        if !self.autosave.take_due(Instant::now()) {
            return false;
        }
        self.persist_quietly().await;
        true
    }

    /// Waits for the pending autosave (if any) and runs it.
    pub async fn settle(&mut self) {
        if let Some(deadline) = self.autosave.deadline() {
            tokio::time::sleep_until(deadline).await;
            self.flush_autosave().await;
        }
    }

    /// Writes a pending autosave immediately. Call before exiting.
    pub async fn shutdown(&mut self) -> Result<(), IntakeError> {
        if self.autosave.cancel() {
            debug!("flushing pending autosave on shutdown");
            self.persist_now().await?;
        }
        Ok(())
    }

    fn capture(&mut self) {
        self.view.capture(&mut self.state);
        self.state.normalize();
        self.state.touch(Utc::now());
    }

    /// Captures the view and writes the working copy to the store.
    pub async fn persist_now(&mut self) -> Result<(), IntakeError> {
        self.capture();
        self.write_local().await
    }

    async fn persist_quietly(&mut self) {
        if let Err(err) = self.persist_now().await {
            warn!(error = %err, "local save failed");
        }
    }

    async fn write_local(&mut self) -> Result<(), IntakeError> {
        let serialized = serde_json::to_string(&self.state)
            .map_err(|source| IntakeError::Serialize { source })?;

        if let Err(err) = self.store.set(&self.storage_key, &serialized).await {
            self.status = SaveStatus::Failed {
                message: err.to_string(),
            };
            return Err(err.into());
        }
        self.status = SaveStatus::SavedLocally;

        if self.legacy_cleanup {
            for key in &self.legacy_keys {
                if let Err(err) = self.store.remove(key).await {
                    warn!(%key, error = %err, "cannot remove legacy storage key");
                    return Ok(());
                }
            }
            debug!("removed legacy storage keys");
            self.legacy_cleanup = false;
        }
        Ok(())
    }

    fn suggested_name(&self) -> String {
        suggested_filename(&self.state.customer.name, Utc::now().date_naive())
    }

    /// Cancels the autosave, writes the store, then prepares the file document.
    async fn prepare_explicit_save(&mut self) -> Result<(String, String), IntakeError> {
        self.autosave.cancel();
        self.capture();
        if let Err(err) = self.write_local().await {
            warn!(error = %err, "local save failed during explicit save");
        }
        let contents = self
            .state
            .to_document_string()
            .map_err(|source| IntakeError::Serialize { source })?;
        Ok((contents, self.suggested_name()))
    }

    /// Writes to the bound file, or asks for one when unbound.
    pub async fn save(&mut self) -> Result<FileOutcome, IntakeError> {
        let (contents, suggested) = self.prepare_explicit_save().await?;
        let outcome = match self.files.save(&contents, &suggested).await? {
            Some(target) => FileOutcome::Saved(target),
            None => FileOutcome::Cancelled,
        };
        log_file_outcome(&outcome);
        Ok(outcome)
    }

    /// Asks for a new file, writes it, and binds it.
    pub async fn save_as(&mut self) -> Result<FileOutcome, IntakeError> {
        let (contents, suggested) = self.prepare_explicit_save().await?;
        let outcome = match self.files.save_as(&contents, &suggested).await? {
            Some(target) => FileOutcome::Saved(target),
            None => FileOutcome::Cancelled,
        };
        log_file_outcome(&outcome);
        Ok(outcome)
    }

    /// Asks for a file, reconciles it into the state, and binds it.
    ///
    /// The binding only changes after the contents parse. A cancelled chooser or unparsable
    /// contents leave state and binding untouched.
    pub async fn open(&mut self) -> Result<FileOutcome, IntakeError> {
        let Some((target, text)) = self.files.choose_and_read().await? else {
            log_file_outcome(&FileOutcome::Cancelled);
            return Ok(FileOutcome::Cancelled);
        };
        let document = parse_document(&text)?;

        self.replace_from(&document);
        self.files.bind(target.clone());
        self.persist_quietly().await;

        let outcome = FileOutcome::Opened(target);
        log_file_outcome(&outcome);
        Ok(outcome)
    }

    /// Parses pasted text and imports it.
    pub async fn import_text(&mut self, text: &str) -> Result<ReconcileReport, IntakeError> {
        let document = parse_document(text)?;
        Ok(self.import_document(&document).await)
    }

    /// Replaces the state with the reconciled document, unbinds the file and persists.
    pub async fn import_document(&mut self, document: &Value) -> ReconcileReport {
        let report = self.replace_from(document);
        self.files.unbind();
        self.persist_quietly().await;
        info!(migrations = report.migrations.len(), "imported intake document");
        report
    }

    fn replace_from(&mut self, document: &Value) -> ReconcileReport {
        self.autosave.cancel();
        let (state, report) = reconcile_with_report(document, Utc::now());
        self.state = state;
        self.view.render(&self.state);
        report
    }

    /// Starts over from defaults, unbinds the file and persists.
    pub async fn new_intake(&mut self) {
        self.autosave.cancel();
        self.state = default_state();
        self.files.unbind();
        self.view.render(&self.state);
        self.persist_quietly().await;
        info!("started new intake");
    }

    /// Switches tabs and persists immediately.
    pub async fn set_active_tab(&mut self, tab: Tab) {
        self.autosave.cancel();
        self.view.capture(&mut self.state);
        self.state.last_active_tab = tab;
        self.persist_quietly().await;
        self.view.render(&self.state);
    }

    /// An independent copy of the current state, including values the view has not committed.
    pub fn export(&mut self) -> CanonicalState {
        self.view.capture(&mut self.state);
        self.state.normalize();
        self.state.clone()
    }

    /// Indented document text of `export`.
    pub fn export_text(&mut self) -> Result<String, IntakeError> {
        self.export()
            .to_document_string()
            .map_err(|source| IntakeError::Serialize { source })
    }

    /// Writes the exported document into `dir` under the suggested filename without binding it.
    pub async fn download(&mut self, dir: &Path) -> Result<FileTarget, IntakeError> {
        let contents = self.export_text()?;
        let target = FileTarget::new(dir.join(self.suggested_name()));
        self.files.host().write(&target, &contents).await?;
        info!(file = %target, "downloaded intake document");
        Ok(target)
    }
}

fn parse_document(text: &str) -> Result<Value, IntakeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(IntakeError::EmptyInput);
    }
    serde_json::from_str(text).map_err(|source| IntakeError::InvalidJson { source })
}

fn log_file_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Saved(target) => info!(file = %target, "saved intake file"),
        FileOutcome::Opened(target) => info!(file = %target, "opened intake file"),
        FileOutcome::Cancelled => debug!("file chooser cancelled"),
    }
}
