use kingclass::config::Config;
use kingclass::{ipc, logging};

use std::io::{self, BufRead, Write};

fn main() {
    let config = Config::from_env();
    if let Err(e) = logging::init_logging(&config) {
        eprintln!("kingclassd: logging disabled: {e:#}");
    }

    let mut state = ipc::AppState::default();
    if let Some(path) = config.workspace.as_deref() {
        // A bad preset workspace must not stop the daemon; the client can still select one.
        if let Err(e) = ipc::open_workspace(&mut state, path) {
            tracing::warn!(workspace = %path.display(), error = %e, "failed to open configured workspace");
        }
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "kingclassd ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "unparseable request line");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let span = tracing::debug_span!("request", id = %req.id, method = %req.method);
        let _enter = span.enter();
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
