//! RPC method handler for the Phonebook JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` is the single entry point through which every
//! presentation front end (RPC shell or terminal) mutates application state;
//! `state_view` serializes what the front end needs to render.
//!
//! Store-backed methods hold the app lock only to begin and to finish a
//! flow; the store call itself runs unlocked so other requests, including
//! `state.get`, are answered while it is in flight.

use std::path::PathBuf;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use tracing::info;

use crate::managers::directory_manager::{DirectoryManager, FetchOutcome, SubmitOutcome};
use crate::services::default_directory::default_count;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::directory::{EntryField, PhoneEntry};

fn str_param<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|v| v.as_str())
}

fn entry_json(e: &PhoneEntry) -> Value {
    json!({
        "id": e.id,
        "building": e.building,
        "department": e.department,
        "number": e.number,
        "created_at": e.created_at,
    })
}

/// Snapshot of everything the presentation renders.
pub fn state_view(dir: &DirectoryManager) -> Value {
    let flags = dir.flags();
    let groups: Vec<Value> = dir
        .grouped_entries()
        .iter()
        .map(|g| {
            json!({
                "building": g.building,
                "count": g.entries.len(),
                "entries": g.entries.iter().map(|e| json!({
                    "id": e.id,
                    "department": e.department_label(),
                    "number": e.number_label(),
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    let form = dir.form().map(|f| {
        json!({
            "editing_id": f.editing_id,
            "building": f.draft.building,
            "department": f.draft.department,
            "number": f.draft.number,
            "custom_building": f.custom_building,
        })
    });

    json!({
        "search_term": dir.search_term(),
        "result_count": dir.result_count(),
        "total_count": dir.entries().len(),
        "groups": groups,
        "buildings": dir.distinct_buildings(),
        "flags": {
            "loading": flags.loading,
            "saving": flags.saving,
            "syncing": flags.syncing,
        },
        "show_seed_banner": dir.show_seed_banner(),
        "seed_count": default_count(),
        "form": form,
        "pending_delete": dir.pending_delete(),
        "history_open": dir.is_history_open(),
        "history": dir.history_items(),
    })
}

fn submit_json(outcome: SubmitOutcome) -> Result<Value, String> {
    match outcome {
        SubmitOutcome::Created(entry) => Ok(json!({"created": entry_json(&entry)})),
        SubmitOutcome::Updated(entry) => Ok(json!({"updated": entry_json(&entry)})),
        SubmitOutcome::Invalid(e) => Ok(json!({"invalid": e.to_string()})),
        SubmitOutcome::StoreFailed => Ok(json!({"failed": true})),
        SubmitOutcome::Busy => Err("busy: another save is in progress".to_string()),
        SubmitOutcome::NoForm => Err("no form is open".to_string()),
    }
}

async fn fetch(app: &Mutex<App>, silent: bool) -> FetchOutcome {
    let store = {
        let mut a = app.lock().await;
        a.directory.begin_fetch(silent);
        a.directory.store()
    };
    let result = store.list().await;
    app.lock().await.directory.finish_fetch(silent, result)
}

/// Startup sequence: silent fetch of the remote directory. Front ends run
/// it after their first render so the bundled list shows immediately.
pub async fn startup(app: &Mutex<App>) -> FetchOutcome {
    let outcome = fetch(app, true).await;
    info!(?outcome, "startup fetch finished");
    outcome
}

/// Dispatch a JSON-RPC method call to the directory controller.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── State ───
        "state.get" => {
            let a = app.lock().await;
            Ok(state_view(&a.directory))
        }
        "entries.list" => {
            let a = app.lock().await;
            let arr: Vec<Value> = a.directory.entries().iter().map(entry_json).collect();
            Ok(json!(arr))
        }
        "buildings.list" => {
            let a = app.lock().await;
            Ok(json!(a.directory.distinct_buildings()))
        }
        "notices.take" => {
            let mut a = app.lock().await;
            Ok(json!(a.directory.take_notices()))
        }

        // ─── Loading / seeding ───
        "directory.refresh" => {
            let outcome = fetch(app, false).await;
            Ok(json!({"outcome": format!("{:?}", outcome)}))
        }
        "directory.seed" => {
            let confirmed = params.get("confirm").and_then(|v| v.as_bool()).unwrap_or(false);
            let (rows, store) = {
                let mut a = app.lock().await;
                if !confirmed {
                    return Ok(json!({"confirm": a.directory.seed_prompt(), "count": default_count()}));
                }
                let rows = a
                    .directory
                    .begin_seed()
                    .ok_or("busy: seeding already in progress")?;
                (rows, a.directory.store())
            };

            let uploaded = store.bulk_upsert(&rows).await;
            if !app.lock().await.directory.finish_seed_upload(uploaded) {
                return Ok(json!({"failed": true}));
            }
            let fetched = store.list().await;
            app.lock().await.directory.finish_seed(fetched);
            Ok(json!({"seeded": rows.len()}))
        }

        // ─── Search ───
        "search.set" => {
            let term = str_param(params, "term").ok_or("missing term")?;
            let mut a = app.lock().await;
            a.directory.set_search_term(term, Instant::now());
            Ok(json!({"result_count": a.directory.result_count()}))
        }
        "search.reset" => {
            let mut a = app.lock().await;
            a.directory.reset_search(Instant::now());
            Ok(json!({"ok": true}))
        }

        // ─── Form ───
        "form.open_add" => {
            let mut a = app.lock().await;
            a.directory.open_add_form();
            Ok(json!({"ok": true}))
        }
        "form.open_edit" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let mut a = app.lock().await;
            if !a.directory.open_edit_form(id) {
                return Err(format!("entry not found: {}", id));
            }
            Ok(json!({"ok": true}))
        }
        "form.close" => {
            let mut a = app.lock().await;
            a.directory.close_form();
            Ok(json!({"ok": true}))
        }
        "form.set" => {
            let name = str_param(params, "field").ok_or("missing field")?;
            let field = EntryField::parse(name).ok_or_else(|| format!("unknown field: {}", name))?;
            let value = str_param(params, "value").ok_or("missing value")?;
            let mut a = app.lock().await;
            if !a.directory.update_draft(field, value) {
                return Err("no form is open".to_string());
            }
            Ok(json!({"ok": true}))
        }
        "form.custom_building" => {
            let enabled = params.get("enabled").and_then(|v| v.as_bool()).ok_or("missing enabled")?;
            let mut a = app.lock().await;
            if !a.directory.set_custom_building(enabled) {
                return Err("no form is open".to_string());
            }
            Ok(json!({"ok": true}))
        }
        "form.submit" => {
            let (pending, store) = {
                let mut a = app.lock().await;
                match a.directory.begin_submit() {
                    Ok(pending) => (pending, a.directory.store()),
                    Err(outcome) => return submit_json(outcome),
                }
            };
            let result = pending.send(store.as_ref()).await;
            let outcome = app.lock().await.directory.finish_submit(pending, result);
            submit_json(outcome)
        }

        // ─── Deletion ───
        "delete.request" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let mut a = app.lock().await;
            a.directory.request_delete(id);
            Ok(json!({"ok": true}))
        }
        "form.delete" => {
            let mut a = app.lock().await;
            if !a.directory.request_delete_editing() {
                return Err("no entry is being edited".to_string());
            }
            Ok(json!({"pending_delete": a.directory.pending_delete()}))
        }
        "delete.cancel" => {
            let mut a = app.lock().await;
            a.directory.cancel_delete();
            Ok(json!({"ok": true}))
        }
        "delete.confirm" => {
            let (id, store) = {
                let mut a = app.lock().await;
                if a.directory.flags().saving {
                    return Err("busy: another save is in progress".to_string());
                }
                let id = a.directory.begin_delete().ok_or("nothing to delete")?;
                (id, a.directory.store())
            };
            let result = store.delete(&id).await;
            let id = app.lock().await.directory.finish_delete(id, result);
            Ok(json!({"deleted": id}))
        }

        // ─── History ───
        "history.list" => {
            let a = app.lock().await;
            Ok(json!(a.directory.history_items()))
        }
        "history.open" => {
            let mut a = app.lock().await;
            a.directory.open_history();
            Ok(json!({"ok": true}))
        }
        "history.close" => {
            let mut a = app.lock().await;
            a.directory.close_history();
            Ok(json!({"ok": true}))
        }
        "history.select" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let mut a = app.lock().await;
            if !a.directory.select_history(id, Instant::now()) {
                return Err(format!("history item not found: {}", id));
            }
            Ok(json!({"search_term": a.directory.search_term()}))
        }
        "history.clear" => {
            let mut a = app.lock().await;
            a.directory.clear_history().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Export ───
        "export.csv" => {
            let mut a = app.lock().await;
            let dir = str_param(params, "directory")
                .map(PathBuf::from)
                .unwrap_or_else(|| a.export_dir());
            let path = a.directory.export_csv(&dir, chrono::Utc::now());
            Ok(json!({"path": path.map(|p| p.to_string_lossy().to_string())}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key").ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            a.apply_settings();
            Ok(json!({"ok": true}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
