//! Phonebook RPC Server: JSON-RPC over stdin/stdout for an external UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"form.submit", "params":{}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"history.recorded", "term":"..."} when a search settles.
//!
//! Requests run concurrently, so a slow store call does not hold up the ones
//! behind it and responses may arrive out of request order; match them by `id`.

use std::io::Write;
use std::sync::Arc;

use phonebook::app::App;
use phonebook::rpc_handler::{handle_method, startup};
use phonebook::telemetry;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

fn emit(value: &Value) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", value);
    let _ = stdout.flush();
}

async fn history_deadline(app: &Mutex<App>) -> Option<tokio::time::Instant> {
    let a = app.lock().await;
    a.directory
        .next_history_deadline()
        .map(tokio::time::Instant::from_std)
}

#[tokio::main]
async fn main() {
    telemetry::init();

    let config_override = std::env::args().nth(1);
    let app = match App::open(config_override) {
        Ok(app) => Arc::new(Mutex::new(app)),
        Err(e) => {
            error!(error = %e, "failed to initialize phonebook");
            emit(&json!({"event": "fatal", "error": e.to_string()}));
            std::process::exit(1);
        }
    };

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut tasks = JoinSet::new();
    {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            startup(&app).await;
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = history_deadline(&app).await;

        let line = tokio::select! {
            line = lines.next_line() => line,
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "request task failed");
                }
                continue;
            }
            _ = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                let mut a = app.lock().await;
                if a.directory.poll_history(std::time::Instant::now()) {
                    emit(&json!({"event": "history.recorded", "term": a.directory.search_term()}));
                }
                continue;
            }
        };

        let line = match line {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req
            .get("method")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let app = Arc::clone(&app);
        tasks.spawn(async move {
            let response = match handle_method(&app, &method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => json!({"id": id, "error": err}),
            };
            emit(&response);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "request task failed");
        }
    }
    app.lock().await.shutdown();
    info!("rpc server stopped");
}
