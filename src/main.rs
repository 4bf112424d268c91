//! Phonebook: hospital internal telephone directory.
//!
//! Entry point: interactive terminal shell. Every command is routed through
//! `rpc_handler::handle_method` on its own task; the screen is re-rendered
//! whenever one finishes, so flags raised by a slow store call stay visible
//! while the shell keeps accepting input.

use std::io::Write;
use std::sync::Arc;

use phonebook::app::App;
use phonebook::rpc_handler::{handle_method, startup};
use phonebook::telemetry;
use phonebook::ui::commands::{parse_command, ShellCommand, HELP};
use phonebook::ui::terminal_view::{render, render_notice};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

async fn redraw(app: &Mutex<App>) {
    let mut a = app.lock().await;
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{}", render(&a.directory));
    for notice in a.directory.take_notices() {
        let _ = writeln!(stdout, "{}", render_notice(&notice));
    }
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

fn print_reply(method: &str, reply: &Result<Value, String>) {
    match reply {
        Ok(value) => {
            if let Some(prompt) = value.get("confirm").and_then(|v| v.as_str()) {
                println!("{} (พิมพ์ `seed yes` เพื่อยืนยัน)", prompt);
            } else if let Some(msg) = value.get("invalid").and_then(|v| v.as_str()) {
                println!("✖  {}", msg);
            }
        }
        Err(e) => println!("✖  {}: {}", method, e),
    }
}

async fn run_command(app: &Mutex<App>, command: ShellCommand) {
    match command {
        ShellCommand::PickHistory(n) => {
            let id = {
                let a = app.lock().await;
                a.directory.history_items().get(n - 1).map(|item| item.id.clone())
            };
            match id {
                Some(id) => {
                    let reply = handle_method(app, "history.select", &json!({"id": id})).await;
                    print_reply("history.select", &reply);
                }
                None => println!("ไม่มีประวัติลำดับที่ {}", n),
            }
        }
        ShellCommand::Call { method, params } => {
            let reply = handle_method(app, method, &params).await;
            print_reply(method, &reply);
        }
        ShellCommand::Help | ShellCommand::Quit | ShellCommand::Unknown(_) => {}
    }
}

#[tokio::main]
async fn main() {
    telemetry::init();

    let config_override = std::env::args().nth(1);
    let app = match App::open(config_override) {
        Ok(app) => Arc::new(Mutex::new(app)),
        Err(e) => {
            error!(error = %e, "failed to initialize phonebook");
            eprintln!("phonebook: {}", e);
            std::process::exit(1);
        }
    };

    println!("Phonebook v{} (พิมพ์ help เพื่อดูคำสั่ง)", env!("CARGO_PKG_VERSION"));
    redraw(&app).await;

    let mut tasks = JoinSet::new();
    {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            startup(&app).await;
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = {
            let a = app.lock().await;
            a.directory
                .next_history_deadline()
                .map(tokio::time::Instant::from_std)
        };

        let line = tokio::select! {
            line = lines.next_line() => line,
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "command task failed");
                }
                redraw(&app).await;
                continue;
            }
            _ = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                app.lock().await.directory.poll_history(std::time::Instant::now());
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
            redraw(&app).await;
            continue;
        }

        match parse_command(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Unknown(line) => println!("ไม่รู้จักคำสั่ง: {} (พิมพ์ help)", line),
            command => {
                let app = Arc::clone(&app);
                tasks.spawn(async move {
                    run_command(&app, command).await;
                });
                continue;
            }
        }
        redraw(&app).await;
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "command task failed");
        }
    }
    app.lock().await.shutdown();
    info!("phonebook stopped");
}
