//! Unit tests for the DirectoryManager flows against an in-memory store.

#[path = "../support/mock_store.rs"]
mod mock_store;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use mock_store::{entry, MockStore};
use phonebook::database::Database;
use phonebook::managers::directory_manager::{
    DirectoryManager, FetchOutcome, PendingSubmit, SeedOutcome, SubmitOutcome,
};
use phonebook::managers::search_history_manager::SearchHistoryManager;
use phonebook::services::default_directory::default_count;
use phonebook::types::directory::{
    EntryDraft, EntryField, NoticeLevel, PhoneEntry, UNSPECIFIED_BUILDING,
};
use phonebook::types::errors::{StoreError, ValidationError};
use phonebook::types::settings::HistorySettings;

fn manager(store: &Arc<MockStore>) -> DirectoryManager {
    let history = SearchHistoryManager::new(Database::open_in_memory().unwrap(), 50).unwrap();
    DirectoryManager::new(store.clone(), history, &HistorySettings::default())
}

fn sample_rows() -> Vec<PhoneEntry> {
    vec![
        entry("100", "ตึก A", "ห้องฉุกเฉิน", "1101"),
        entry("101", "ตึก B", "Lab", "2202"),
        entry("102", "ตึก A", "ICU", "1310"),
    ]
}

// ─── Loading ───

#[test]
fn test_defaults_shown_before_first_fetch() {
    let store = Arc::new(MockStore::new());
    let dir = manager(&store);
    assert_eq!(dir.entries().len(), default_count());
    assert!(!dir.show_seed_banner());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_initialize_replaces_list_with_store_rows() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    let mut dir = manager(&store);

    assert_eq!(dir.initialize().await, FetchOutcome::Loaded(3));
    assert_eq!(dir.entries(), sample_rows().as_slice());
    assert!(!dir.store_empty());
    assert!(!dir.show_seed_banner());
    assert!(!dir.flags().loading);
}

#[tokio::test]
async fn test_empty_store_keeps_defaults_and_shows_banner() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    assert_eq!(dir.initialize().await, FetchOutcome::Empty);
    assert_eq!(dir.entries().len(), default_count());
    assert!(dir.store_empty());
    assert!(dir.show_seed_banner());
}

#[tokio::test]
async fn test_failed_fetch_keeps_list_without_banner_or_notice() {
    let store = Arc::new(MockStore::new());
    store.fail_list.store(true, Ordering::SeqCst);
    let mut dir = manager(&store);

    assert_eq!(dir.initialize().await, FetchOutcome::Failed);
    assert_eq!(dir.entries().len(), default_count());
    assert!(!dir.show_seed_banner());
    assert!(dir.take_notices().is_empty());
}

#[tokio::test]
async fn test_failed_refresh_keeps_loaded_rows() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    let mut dir = manager(&store);
    dir.initialize().await;

    store.fail_list.store(true, Ordering::SeqCst);
    assert_eq!(dir.refresh().await, FetchOutcome::Failed);
    assert_eq!(dir.entries().len(), 3);
    assert!(!dir.flags().loading);
}

// ─── Create ───

#[tokio::test]
async fn test_create_appends_and_closes_form() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    let mut dir = manager(&store);
    dir.initialize().await;

    dir.open_add_form();
    dir.update_draft(EntryField::Building, "ตึก C");
    dir.update_draft(EntryField::Department, "เภสัชกรรม");
    dir.update_draft(EntryField::Number, "3301");

    let created = match dir.submit_form().await {
        SubmitOutcome::Created(e) => e,
        other => panic!("expected Created, got {:?}", other),
    };
    assert_eq!(dir.entries().len(), 4);
    assert_eq!(dir.entries().last(), Some(&created));
    assert_eq!(created.department, "เภสัชกรรม");
    assert!(created.created_at.is_some());
    assert!(created.id.parse::<i64>().is_ok());
    assert!(dir.form().is_none());
    assert!(!dir.flags().saving);
    assert_eq!(store.rows().len(), 4);
}

#[tokio::test]
async fn test_create_failure_leaves_list_and_form() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    store.fail_insert.store(true, Ordering::SeqCst);
    let mut dir = manager(&store);
    dir.initialize().await;

    dir.open_add_form();
    dir.update_draft(EntryField::Building, "ตึก C");
    dir.update_draft(EntryField::Department, "เภสัชกรรม");
    dir.update_draft(EntryField::Number, "3301");

    assert_eq!(dir.submit_form().await, SubmitOutcome::StoreFailed);
    assert_eq!(dir.entries().len(), 3);
    assert_eq!(dir.form().map(|f| f.draft.number.as_str()), Some("3301"));

    let notices = dir.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_store() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.open_add_form();
    dir.update_draft(EntryField::Building, "ตึก C");
    dir.update_draft(EntryField::Number, "3301");

    assert_eq!(
        dir.submit_form().await,
        SubmitOutcome::Invalid(ValidationError::MissingField("department"))
    );
    assert!(store.calls().is_empty());
    assert!(dir.form().is_some());
}

#[tokio::test]
async fn test_submit_without_form() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    assert_eq!(dir.submit_form().await, SubmitOutcome::NoForm);
}

#[tokio::test]
async fn test_created_ids_do_not_collide() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let draft = EntryDraft::new("ตึก C", "เภสัชกรรม", "3301");

    let first = dir.create_entry(&draft).await;
    let second = dir.create_entry(&draft).await;
    match (first, second) {
        (SubmitOutcome::Created(a), SubmitOutcome::Created(b)) => assert_ne!(a.id, b.id),
        other => panic!("expected two creates, got {:?}", other),
    }
}

// ─── Edit ───

#[tokio::test]
async fn test_edit_applies_locally_even_when_store_fails() {
    let store = Arc::new(MockStore::new());
    store.fail_update.store(true, Ordering::SeqCst);
    let mut dir = manager(&store);

    assert!(dir.open_edit_form("5"));
    dir.update_draft(EntryField::Number, "1299");

    match dir.submit_form().await {
        SubmitOutcome::Updated(e) => assert_eq!(e.number, "1299"),
        other => panic!("expected Updated, got {:?}", other),
    }
    let edited = dir.entries().iter().find(|e| e.id == "5").unwrap();
    assert_eq!(edited.number, "1299");
    assert_eq!(edited.department, "เวชระเบียน");
    assert!(dir.take_notices().is_empty());
    assert_eq!(store.calls(), vec!["update 5".to_string()]);
}

#[tokio::test]
async fn test_edit_keeps_created_at_and_position() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    let mut dir = manager(&store);
    dir.initialize().await;

    let draft = EntryDraft::new("ตึก B", "Lab กลาง", "2203");
    dir.update_entry("101", &draft).await;

    assert_eq!(dir.entries()[1].id, "101");
    assert_eq!(dir.entries()[1].department, "Lab กลาง");
    assert_eq!(
        dir.entries()[1].created_at.as_deref(),
        Some("2024-01-01T00:00:00.000Z")
    );
    assert_eq!(store.rows()[1].number, "2203");
}

#[test]
fn test_open_edit_unknown_id() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    assert!(!dir.open_edit_form("does-not-exist"));
    assert!(dir.form().is_none());
}

#[test]
fn test_custom_building_toggle_clears_building() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    assert!(!dir.set_custom_building(true));

    assert!(dir.open_edit_form("1"));
    assert!(dir.set_custom_building(true));
    let form = dir.form().unwrap();
    assert!(form.custom_building);
    assert!(form.draft.building.is_empty());
    assert_eq!(form.draft.department, "ห้องฉุกเฉิน (ER)");
}

// ─── Delete ───

#[tokio::test]
async fn test_delete_removes_entry_even_when_store_fails() {
    let store = Arc::new(MockStore::new());
    store.fail_delete.store(true, Ordering::SeqCst);
    let mut dir = manager(&store);

    dir.open_edit_form("7");
    dir.request_delete("7");
    assert_eq!(dir.pending_delete(), Some("7"));

    assert_eq!(dir.confirm_delete().await, Some("7".to_string()));
    assert!(dir.entries().iter().all(|e| e.id != "7"));
    assert_eq!(dir.entries().len(), default_count() - 1);
    assert!(dir.pending_delete().is_none());
    assert!(dir.form().is_none());
    assert!(dir.take_notices().is_empty());
}

#[tokio::test]
async fn test_delete_keeps_unrelated_form_open() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.open_edit_form("8");
    dir.request_delete("7");
    dir.confirm_delete().await;
    assert_eq!(
        dir.form().and_then(|f| f.editing_id.as_deref()),
        Some("8")
    );
}

#[tokio::test]
async fn test_delete_from_edit_form() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.open_add_form();
    assert!(!dir.request_delete_editing());

    dir.open_edit_form("12");
    assert!(dir.request_delete_editing());
    assert_eq!(dir.pending_delete(), Some("12"));
    dir.confirm_delete().await;
    assert!(dir.form().is_none());
    assert_eq!(store.calls(), vec!["delete 12".to_string()]);
}

#[tokio::test]
async fn test_cancel_delete_sends_nothing() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.request_delete("7");
    dir.cancel_delete();
    assert!(dir.pending_delete().is_none());
    assert_eq!(dir.confirm_delete().await, None);
    assert!(store.calls().is_empty());
    assert_eq!(dir.entries().len(), default_count());
}

// ─── Seed ───

#[tokio::test]
async fn test_seed_uploads_defaults_and_reloads() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    dir.initialize().await;
    assert!(dir.show_seed_banner());

    assert!(dir.seed_prompt().contains(&default_count().to_string()));
    assert_eq!(dir.seed_defaults().await, SeedOutcome::Seeded(default_count()));

    assert_eq!(store.rows().len(), default_count());
    assert!(dir.entries().iter().all(|e| e.created_at.is_some()));
    assert!(!dir.store_empty());
    assert!(!dir.show_seed_banner());
    assert!(!dir.flags().syncing);
    assert_eq!(
        store.calls(),
        vec![
            "list".to_string(),
            format!("bulk_upsert {}", default_count()),
            "list".to_string()
        ]
    );

    let notices = dir.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[tokio::test]
async fn test_seed_failure_mentions_permissions() {
    let store = Arc::new(MockStore::new());
    store.fail_upsert.store(true, Ordering::SeqCst);
    let mut dir = manager(&store);
    dir.initialize().await;

    assert_eq!(dir.seed_defaults().await, SeedOutcome::Failed);
    assert!(dir.store_empty());
    assert!(!dir.flags().syncing);

    let notices = dir.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("RLS"));
}

// ─── In-flight flags ───

fn filled_draft() -> EntryDraft {
    EntryDraft {
        building: "ตึก A".to_string(),
        department: "Lab".to_string(),
        number: "2202".to_string(),
    }
}

#[test]
fn test_loading_raised_between_fetch_halves() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.begin_fetch(false);
    assert!(dir.flags().loading);
    assert_eq!(
        dir.finish_fetch(false, Ok(sample_rows())),
        FetchOutcome::Loaded(3)
    );
    assert!(!dir.flags().loading);

    dir.begin_fetch(true);
    assert!(!dir.flags().loading);
}

#[test]
fn test_syncing_spans_upload_and_reload() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    dir.finish_fetch(true, Ok(Vec::new()));
    assert!(dir.show_seed_banner());

    let rows = dir.begin_seed().expect("first seed should start");
    assert_eq!(rows.len(), default_count());
    assert!(dir.flags().syncing);
    assert!(!dir.show_seed_banner());
    assert!(dir.begin_seed().is_none());

    assert!(dir.finish_seed_upload(Ok(rows.clone())));
    assert!(dir.flags().syncing);
    assert!(dir.flags().loading);
    assert!(dir.begin_seed().is_none());

    assert_eq!(dir.finish_seed(Ok(rows)), FetchOutcome::Loaded(default_count()));
    assert!(!dir.flags().syncing);
    assert!(!dir.flags().loading);
    assert!(dir.begin_seed().is_some());
}

#[test]
fn test_failed_upload_lowers_syncing() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.begin_seed();
    let failed = Err(StoreError::Transport("connection reset".to_string()));
    assert!(!dir.finish_seed_upload(failed));
    assert!(!dir.flags().syncing);
    assert!(!dir.flags().loading);
}

#[tokio::test]
async fn test_seed_refused_while_syncing() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.begin_seed();
    assert_eq!(dir.seed_defaults().await, SeedOutcome::Busy);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_writes_refused_while_saving() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.open_add_form();
    for (field, value) in [
        (EntryField::Building, "ตึก A"),
        (EntryField::Department, "Lab"),
        (EntryField::Number, "2202"),
    ] {
        dir.update_draft(field, value);
    }
    let pending = dir.begin_submit().expect("valid form should start saving");
    assert!(matches!(pending, PendingSubmit::Create(_)));
    assert!(dir.flags().saving);

    assert_eq!(dir.submit_form().await, SubmitOutcome::Busy);
    assert_eq!(dir.update_entry("5", &filled_draft()).await, SubmitOutcome::Busy);

    dir.request_delete("7");
    assert_eq!(dir.confirm_delete().await, None);
    dir.cancel_delete();
    assert_eq!(dir.pending_delete(), Some("7"));
    assert!(store.calls().is_empty());

    let result = pending.send(store.as_ref()).await;
    assert!(matches!(
        dir.finish_submit(pending, result),
        SubmitOutcome::Created(_)
    ));
    assert!(!dir.flags().saving);
    assert!(dir.form().is_none());
    assert_eq!(store.rows().len(), 1);
}

#[test]
fn test_invalid_draft_reported_before_busy() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    dir.begin_update("5", &filled_draft()).expect("edit should start saving");
    let outcome = dir.begin_create(&EntryDraft::default());
    assert_eq!(
        outcome,
        Err(SubmitOutcome::Invalid(ValidationError::MissingField("department")))
    );
}

#[test]
fn test_delete_halves_hold_saving() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);

    assert!(dir.begin_delete().is_none());
    dir.open_edit_form("7");
    dir.request_delete_editing();
    let id = dir.begin_delete().expect("marked entry should start deleting");
    assert!(dir.flags().saving);
    assert!(dir.begin_delete().is_none());

    let failed = Err(StoreError::Transport("timeout".to_string()));
    assert_eq!(dir.finish_delete(id, failed), "7");
    assert!(!dir.flags().saving);
    assert!(dir.pending_delete().is_none());
    assert!(dir.form().is_none());
    assert!(dir.entries().iter().all(|e| e.id != "7"));
}

// ─── Search ───

#[test]
fn test_filter_and_group_by_term() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let now = Instant::now();

    dir.set_search_term("opd", now);
    assert_eq!(dir.result_count(), 6);
    let groups = dir.grouped_entries();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].building, "อาคารผู้ป่วยนอก");

    dir.set_search_term("1669", now);
    assert_eq!(dir.result_count(), 1);

    dir.set_search_term("ประชาสัมพันธ์", now);
    assert_eq!(dir.grouped_entries()[0].building, UNSPECIFIED_BUILDING);

    dir.reset_search(now);
    assert_eq!(dir.result_count(), default_count());
}

#[test]
fn test_history_records_only_settled_term() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let t0 = Instant::now();

    dir.set_search_term("la", t0);
    dir.set_search_term("lab", t0 + Duration::from_millis(500));
    assert!(!dir.poll_history(t0 + Duration::from_millis(2400)));
    assert!(dir.poll_history(t0 + Duration::from_millis(2500)));
    assert!(!dir.poll_history(t0 + Duration::from_millis(5000)));

    let items = dir.history_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].term, "lab");
    assert_eq!(items[0].result_count, 1);
    assert!(dir.next_history_deadline().is_none());
}

#[test]
fn test_short_terms_are_not_recorded() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let t0 = Instant::now();

    dir.set_search_term("ab", t0);
    assert!(!dir.poll_history(t0 + Duration::from_secs(3)));
    assert!(dir.history_items().is_empty());
}

#[test]
fn test_select_history_reruns_search() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let t0 = Instant::now();

    dir.set_search_term("icu", t0);
    dir.poll_history(t0 + Duration::from_secs(2));
    dir.reset_search(t0 + Duration::from_secs(3));
    let id = dir.history_items()[0].id.clone();

    dir.open_history();
    assert!(dir.select_history(&id, t0 + Duration::from_secs(4)));
    assert_eq!(dir.search_term(), "icu");
    assert!(!dir.is_history_open());
    assert!(dir.next_history_deadline().is_some());
    assert!(!dir.select_history("missing", t0));
}

#[test]
fn test_clear_history() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let t0 = Instant::now();

    dir.set_search_term("icu", t0);
    dir.poll_history(t0 + Duration::from_secs(2));
    dir.clear_history().unwrap();
    assert!(dir.history_items().is_empty());
}

// ─── Export ───

#[tokio::test]
async fn test_export_of_empty_list_only_notifies() {
    let store = Arc::new(MockStore::with_rows(vec![entry("1", "ตึก A", "ER", "1")]));
    let mut dir = manager(&store);
    dir.initialize().await;
    dir.request_delete("1");
    dir.confirm_delete().await;
    assert!(dir.entries().is_empty());

    let tmp = TempDir::new().unwrap();
    assert!(dir.export_csv(tmp.path(), Utc::now()).is_none());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);

    let notices = dir.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "ไม่มีข้อมูลที่จะส่งออก");
}

#[test]
fn test_export_writes_dated_file() {
    let store = Arc::new(MockStore::new());
    let mut dir = manager(&store);
    let tmp = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();

    let path = dir.export_csv(tmp.path(), now).unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("phonebook_backup_2024-03-15.csv")
    );
    assert!(path.exists());
    assert_eq!(dir.take_notices()[0].level, NoticeLevel::Info);
}
