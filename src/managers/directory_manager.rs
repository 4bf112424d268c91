//! Directory Manager for Phonebook.
//!
//! Owns the in-memory record list and every piece of interactive state
//! (search term, search history, form, pending deletion, activity flags,
//! queued notices) and implements the load, seed, create, edit and delete
//! flows against a [`RecordStore`].
//!
//! Every store-backed flow is split into a `begin_*` half that raises the
//! matching activity flag and a `finish_*` half that applies the result, so
//! a front end can await the store call without holding the controller.
//! The `async` methods chain both halves for callers that own the manager.
//!
//! Failure handling differs per flow:
//! - list failures are logged and the current list is kept;
//! - create failures are surfaced and the list is left unchanged;
//! - edit and delete apply locally whatever the store answers, failures are
//!   only logged;
//! - seed failures are surfaced with a permissions hint.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::managers::search_history_manager::{SearchHistoryManager, SearchHistoryManagerTrait};
use crate::services::csv_export;
use crate::services::debounce::Debouncer;
use crate::services::default_directory::{default_count, default_entries};
use crate::services::directory_query::{self, EntryGroup};
use crate::services::record_store::RecordStore;
use crate::types::directory::{EntryDraft, EntryField, Notice, NoticeLevel, PhoneEntry};
use crate::types::errors::{ExportError, HistoryError, StoreError, ValidationError};
use crate::types::history::SearchHistoryItem;
use crate::types::settings::HistorySettings;

const MSG_CREATE_FAILED: &str = "เกิดข้อผิดพลาดในการบันทึกข้อมูลลงฐานข้อมูล กรุณาตรวจสอบ log";
const MSG_SEED_DONE: &str = "นำเข้าข้อมูลสำเร็จทั้งหมดเรียบร้อยแล้ว";
const MSG_SEED_FAILED: &str = "เกิดข้อผิดพลาดในการนำเข้าข้อมูล กรุณาตรวจสอบว่าสิทธิ์การเขียน (RLS policy) ของตารางอนุญาตให้เพิ่มข้อมูลได้";
const MSG_EXPORT_EMPTY: &str = "ไม่มีข้อมูลที่จะส่งออก";
const MSG_EXPORT_FAILED: &str = "ส่งออกข้อมูลไม่สำเร็จ";

/// Busy indicators the presentation turns into disabled or blocked controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityFlags {
    /// A user-requested reload is in flight.
    pub loading: bool,
    /// A create, edit or delete call is in flight.
    pub saving: bool,
    /// A seed upload is in flight; blocks all seed triggers.
    pub syncing: bool,
}

/// Add/edit form state. `editing_id` is `None` for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub editing_id: Option<String>,
    pub draft: EntryDraft,
    /// Free-text building input instead of picking from the known list.
    pub custom_building: bool,
}

/// Result of a list call, kept distinct so "no rows" and "call failed" can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(usize),
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(PhoneEntry),
    Updated(PhoneEntry),
    /// Nothing was sent; the form stays open.
    Invalid(ValidationError),
    /// Create was rejected by the store; the form stays open for retry.
    StoreFailed,
    /// Another write is in flight.
    Busy,
    NoForm,
}

/// A create or edit prepared under [`DirectoryManager::begin_submit`] and
/// settled by [`DirectoryManager::finish_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSubmit {
    Create(PhoneEntry),
    Update(PhoneEntry),
}

impl PendingSubmit {
    pub async fn send(&self, store: &dyn RecordStore) -> Result<PhoneEntry, StoreError> {
        match self {
            PendingSubmit::Create(entry) => store.insert(entry).await,
            PendingSubmit::Update(entry) => store.update(entry).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    Failed,
    Busy,
}

pub struct DirectoryManager {
    store: Arc<dyn RecordStore>,
    history: SearchHistoryManager,
    history_timer: Debouncer,
    min_term_chars: usize,
    entries: Vec<PhoneEntry>,
    search_term: String,
    flags: ActivityFlags,
    store_empty: bool,
    form: Option<EntryForm>,
    pending_delete: Option<String>,
    history_open: bool,
    notices: Vec<Notice>,
}

impl DirectoryManager {
    /// Creates a manager showing the bundled directory until the first fetch lands.
    pub fn new(
        store: Arc<dyn RecordStore>,
        history: SearchHistoryManager,
        settings: &HistorySettings,
    ) -> Self {
        Self {
            store,
            history,
            history_timer: Debouncer::new(Duration::from_millis(settings.debounce_ms)),
            min_term_chars: settings.min_term_chars,
            entries: default_entries(),
            search_term: String::new(),
            flags: ActivityFlags::default(),
            store_empty: false,
            form: None,
            pending_delete: None,
            history_open: false,
            notices: Vec::new(),
        }
    }

    /// Handle on the store, for callers that await store calls with the
    /// controller unlocked between a `begin_*` and a `finish_*` half.
    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    /// Swaps the store; calls already in flight finish against the old one.
    pub fn set_store(&mut self, store: Arc<dyn RecordStore>) {
        self.store = store;
    }

    /// Applies changed history settings without a restart.
    pub fn apply_history_settings(&mut self, settings: &HistorySettings) {
        self.history_timer
            .set_delay(Duration::from_millis(settings.debounce_ms));
        self.min_term_chars = settings.min_term_chars;
        self.history.set_max_items(settings.max_items);
    }

    // ─── Loading ───

    /// Startup fetch: no loading indicator.
    pub async fn initialize(&mut self) -> FetchOutcome {
        self.begin_fetch(true);
        let result = self.store.list().await;
        self.finish_fetch(true, result)
    }

    /// User-requested reload with the loading indicator raised.
    pub async fn refresh(&mut self) -> FetchOutcome {
        self.begin_fetch(false);
        let result = self.store.list().await;
        self.finish_fetch(false, result)
    }

    pub fn begin_fetch(&mut self, silent: bool) {
        if !silent {
            self.flags.loading = true;
        }
    }

    /// Applies the result of a list call.
    pub fn finish_fetch(
        &mut self,
        silent: bool,
        result: Result<Vec<PhoneEntry>, StoreError>,
    ) -> FetchOutcome {
        let outcome = match result {
            Ok(rows) if !rows.is_empty() => {
                let count = rows.len();
                info!(count, "directory loaded from store");
                self.entries = rows;
                self.store_empty = false;
                FetchOutcome::Loaded(count)
            }
            Ok(_) => {
                info!("store reachable but collection is empty");
                self.store_empty = true;
                if self.entries.is_empty() {
                    self.entries = default_entries();
                }
                FetchOutcome::Empty
            }
            Err(e) => {
                warn!(error = %e, "fetch failed, keeping local directory");
                FetchOutcome::Failed
            }
        };

        if !silent {
            self.flags.loading = false;
        }
        outcome
    }

    // ─── Seeding ───

    /// Confirmation text naming how many records a seed would upload.
    pub fn seed_prompt(&self) -> String {
        format!(
            "คุณต้องการนำเข้าข้อมูลเบอร์โทรพื้นฐานจำนวน {} รายการ ไปยังฐานข้อมูลใช่หรือไม่?",
            default_count()
        )
    }

    /// Uploads the bundled directory. Callers must have obtained confirmation.
    pub async fn seed_defaults(&mut self) -> SeedOutcome {
        let Some(rows) = self.begin_seed() else {
            return SeedOutcome::Busy;
        };
        let uploaded = self.store.bulk_upsert(&rows).await;
        if !self.finish_seed_upload(uploaded) {
            return SeedOutcome::Failed;
        }
        let fetched = self.store.list().await;
        self.finish_seed(fetched);
        SeedOutcome::Seeded(rows.len())
    }

    /// Raises `syncing` and returns the rows to upload; `None` while a seed runs.
    pub fn begin_seed(&mut self) -> Option<Vec<PhoneEntry>> {
        if self.flags.syncing {
            return None;
        }
        self.flags.syncing = true;
        Some(default_entries())
    }

    /// Settles the upload. On success the follow-up reload begins and
    /// `syncing` stays raised until [`Self::finish_seed`].
    pub fn finish_seed_upload(&mut self, result: Result<Vec<PhoneEntry>, StoreError>) -> bool {
        match result {
            Ok(rows) => {
                info!(count = rows.len(), "default directory seeded");
                self.store_empty = false;
                self.notify(NoticeLevel::Info, MSG_SEED_DONE);
                self.begin_fetch(false);
                true
            }
            Err(e) => {
                error!(error = %e, "seeding default directory failed");
                self.notify(NoticeLevel::Error, MSG_SEED_FAILED);
                self.flags.syncing = false;
                false
            }
        }
    }

    /// Applies the post-seed reload and lowers `syncing`.
    pub fn finish_seed(&mut self, fetched: Result<Vec<PhoneEntry>, StoreError>) -> FetchOutcome {
        let outcome = self.finish_fetch(false, fetched);
        self.flags.syncing = false;
        outcome
    }

    // ─── Form ───

    pub fn open_add_form(&mut self) {
        self.form = Some(EntryForm::default());
    }

    /// Opens the form on a copy of entry `id`; returns `false` if no such entry.
    pub fn open_edit_form(&mut self, id: &str) -> bool {
        match self.entries.iter().find(|e| e.id == id) {
            Some(entry) => {
                self.form = Some(EntryForm {
                    editing_id: Some(entry.id.clone()),
                    draft: EntryDraft::from(entry),
                    custom_building: false,
                });
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn update_draft(&mut self, field: EntryField, value: &str) -> bool {
        match self.form.as_mut() {
            Some(form) => {
                form.draft.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Switches between picking a known building and typing a new one.
    /// Either way the building field starts over empty.
    pub fn set_custom_building(&mut self, enabled: bool) -> bool {
        match self.form.as_mut() {
            Some(form) => {
                form.custom_building = enabled;
                form.draft.building.clear();
                true
            }
            None => false,
        }
    }

    /// Submits the open form as a create or an edit.
    pub async fn submit_form(&mut self) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(pending) => self.send_submit(pending).await,
            Err(outcome) => outcome,
        }
    }

    /// Inserts a new entry; the list only changes once the store accepts it.
    pub async fn create_entry(&mut self, draft: &EntryDraft) -> SubmitOutcome {
        match self.begin_create(draft) {
            Ok(pending) => self.send_submit(pending).await,
            Err(outcome) => outcome,
        }
    }

    /// Replaces entry `id` locally regardless of the store's answer.
    pub async fn update_entry(&mut self, id: &str, draft: &EntryDraft) -> SubmitOutcome {
        match self.begin_update(id, draft) {
            Ok(pending) => self.send_submit(pending).await,
            Err(outcome) => outcome,
        }
    }

    async fn send_submit(&mut self, pending: PendingSubmit) -> SubmitOutcome {
        let result = pending.send(self.store.as_ref()).await;
        self.finish_submit(pending, result)
    }

    /// Validates the open form and raises `saving`.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitOutcome> {
        let Some(form) = self.form.clone() else {
            return Err(SubmitOutcome::NoForm);
        };
        match form.editing_id {
            Some(id) => self.begin_update(&id, &form.draft),
            None => self.begin_create(&form.draft),
        }
    }

    pub fn begin_create(&mut self, draft: &EntryDraft) -> Result<PendingSubmit, SubmitOutcome> {
        self.check_writable(draft)?;

        let now = Utc::now();
        let entry = PhoneEntry {
            id: self.next_entry_id(now.timestamp_millis()),
            building: draft.building.clone(),
            department: draft.department.clone(),
            number: draft.number.clone(),
            created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        self.flags.saving = true;
        Ok(PendingSubmit::Create(entry))
    }

    pub fn begin_update(
        &mut self,
        id: &str,
        draft: &EntryDraft,
    ) -> Result<PendingSubmit, SubmitOutcome> {
        self.check_writable(draft)?;

        let created_at = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.created_at.clone());
        let updated = PhoneEntry {
            id: id.to_string(),
            building: draft.building.clone(),
            department: draft.department.clone(),
            number: draft.number.clone(),
            created_at,
        };
        self.flags.saving = true;
        Ok(PendingSubmit::Update(updated))
    }

    fn check_writable(&self, draft: &EntryDraft) -> Result<(), SubmitOutcome> {
        draft.validate().map_err(SubmitOutcome::Invalid)?;
        if self.flags.saving {
            return Err(SubmitOutcome::Busy);
        }
        Ok(())
    }

    /// Lowers `saving` and applies the store's answer.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmit,
        result: Result<PhoneEntry, StoreError>,
    ) -> SubmitOutcome {
        self.flags.saving = false;

        match pending {
            PendingSubmit::Create(entry) => match result {
                Ok(_) => {
                    info!(id = %entry.id, "entry created");
                    self.entries.push(entry.clone());
                    self.close_form();
                    SubmitOutcome::Created(entry)
                }
                Err(e) => {
                    error!(error = %e, "creating entry failed");
                    self.notify(NoticeLevel::Error, MSG_CREATE_FAILED);
                    SubmitOutcome::StoreFailed
                }
            },
            PendingSubmit::Update(updated) => {
                if let Err(e) = result {
                    warn!(id = %updated.id, error = %e, "store update failed, applying edit locally only");
                }
                if let Some(slot) = self.entries.iter_mut().find(|e| e.id == updated.id) {
                    *slot = updated.clone();
                }
                SubmitOutcome::Updated(updated)
            }
        }
    }

    /// Timestamp-derived ID, bumped past any collision with the current list.
    fn next_entry_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        while self.entries.iter().any(|e| e.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    // ─── Deletion ───

    /// First phase: mark `id` and raise the confirmation prompt.
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    /// Marks the entry open in the edit form for deletion.
    pub fn request_delete_editing(&mut self) -> bool {
        let Some(id) = self.form.as_ref().and_then(|f| f.editing_id.clone()) else {
            return false;
        };
        self.pending_delete = Some(id);
        true
    }

    /// Ignored while a write is in flight.
    pub fn cancel_delete(&mut self) {
        if !self.flags.saving {
            self.pending_delete = None;
        }
    }

    /// Second phase: delete the marked entry. Returns the removed ID.
    pub async fn confirm_delete(&mut self) -> Option<String> {
        let id = self.begin_delete()?;
        let result = self.store.delete(&id).await;
        Some(self.finish_delete(id, result))
    }

    /// Raises `saving` for the marked entry; `None` if nothing is marked or a write is in flight.
    pub fn begin_delete(&mut self) -> Option<String> {
        if self.flags.saving {
            return None;
        }
        let id = self.pending_delete.clone()?;
        self.flags.saving = true;
        Some(id)
    }

    /// Removes the entry locally whatever the store answered.
    pub fn finish_delete(&mut self, id: String, result: Result<(), StoreError>) -> String {
        self.flags.saving = false;
        if let Err(e) = result {
            warn!(id = %id, error = %e, "store delete failed, removing locally only");
        }

        self.entries.retain(|e| e.id != id);
        let editing_deleted = self
            .form
            .as_ref()
            .is_some_and(|f| f.editing_id.as_deref() == Some(id.as_str()));
        if editing_deleted {
            self.close_form();
        }
        self.pending_delete = None;
        info!(id = %id, "entry deleted");
        id
    }

    // ─── Search ───

    /// Sets the search term and restarts the history quiet period.
    pub fn set_search_term(&mut self, term: &str, now: Instant) {
        self.search_term = term.to_string();
        self.history_timer.schedule(now);
    }

    pub fn reset_search(&mut self, now: Instant) {
        self.set_search_term("", now);
    }

    /// When the history timer is due, records the current term.
    ///
    /// Returns `true` if a new history item was added.
    pub fn poll_history(&mut self, now: Instant) -> bool {
        if !self.history_timer.poll(now) {
            return false;
        }
        if self.search_term.chars().count() <= self.min_term_chars {
            return false;
        }

        let count = self.result_count();
        match self.history.record(&self.search_term, count) {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(error = %e, "could not persist search history");
                false
            }
        }
    }

    /// Drops an unsettled search term without recording it.
    pub fn cancel_history_timer(&mut self) {
        self.history_timer.cancel();
    }

    /// When the event loop should next call [`Self::poll_history`].
    pub fn next_history_deadline(&self) -> Option<Instant> {
        self.history_timer.deadline()
    }

    // ─── History modal ───

    pub fn open_history(&mut self) {
        self.history_open = true;
    }

    pub fn close_history(&mut self) {
        self.history_open = false;
    }

    /// Re-runs a past search and closes the history modal.
    pub fn select_history(&mut self, id: &str, now: Instant) -> bool {
        let Some(term) = self.history.find(id).map(|item| item.term.clone()) else {
            return false;
        };
        self.set_search_term(&term, now);
        self.history_open = false;
        true
    }

    pub fn clear_history(&mut self) -> Result<(), HistoryError> {
        self.history.clear()
    }

    // ─── Export ───

    /// Writes a CSV backup into `dir`, queueing a notice either way.
    pub fn export_csv(&mut self, dir: &Path, now: DateTime<Utc>) -> Option<PathBuf> {
        match csv_export::export_to_dir(&self.entries, dir, now) {
            Ok(path) => {
                info!(path = %path.display(), count = self.entries.len(), "directory exported");
                self.notify(
                    NoticeLevel::Info,
                    &format!("ส่งออกข้อมูลไปยัง {}", path.display()),
                );
                Some(path)
            }
            Err(ExportError::Empty) => {
                self.notify(NoticeLevel::Info, MSG_EXPORT_EMPTY);
                None
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.notify(NoticeLevel::Error, MSG_EXPORT_FAILED);
                None
            }
        }
    }

    // ─── Notices ───

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push(Notice {
            level,
            message: message.to_string(),
        });
    }

    /// Drains queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Read-only state ───

    pub fn entries(&self) -> &[PhoneEntry] {
        &self.entries
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn flags(&self) -> ActivityFlags {
        self.flags
    }

    pub fn form(&self) -> Option<&EntryForm> {
        self.form.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn is_history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_items(&self) -> &[SearchHistoryItem] {
        self.history.items()
    }

    /// The remote collection answered with no rows on the last fetch.
    pub fn store_empty(&self) -> bool {
        self.store_empty
    }

    pub fn show_seed_banner(&self) -> bool {
        self.store_empty && !self.flags.loading && !self.flags.syncing
    }

    pub fn filtered_entries(&self) -> Vec<&PhoneEntry> {
        directory_query::filter_entries(&self.entries, &self.search_term)
    }

    pub fn grouped_entries(&self) -> Vec<EntryGroup<'_>> {
        directory_query::group_by_building(&self.filtered_entries())
    }

    pub fn result_count(&self) -> usize {
        self.filtered_entries().len()
    }

    pub fn distinct_buildings(&self) -> Vec<String> {
        directory_query::distinct_buildings(&self.entries)
    }
}
