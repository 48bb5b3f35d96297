mod cli;

use celadon_app::{App, AppConfig, WINDOW_ACTION_CHANNEL};
use celadon_bridge::{Envelope, JsonCodec, PayloadCodec};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct CalcRequest {
    a: f64,
    b: f64,
    op: String,
}

#[derive(Debug, Serialize)]
struct CalcResponse {
    expression: String,
    result: f64,
    success: bool,
}

/// Register the demo's host-side handlers.
fn register_demo_handlers(app: &App) {
    let bridge = app.bridge();

    bridge
        .on("demo:greet", |session, payload| {
            let name = if payload.is_empty() { "World" } else { payload };
            info!(session = %session, name, "greet requested");
            Some(format!(
                r#"{{"greeting":"Hello, {name}!","timestamp":"{}"}}"#,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            ))
        })
        .expect("channel name is non-empty");

    bridge
        .on("demo:calculate", |_, payload| {
            let codec = JsonCodec;
            let request: CalcRequest = match codec.decode(payload) {
                Ok(r) => r,
                Err(e) => {
                    warn!("calculate request rejected: {e}");
                    return Some(r#"{"success":false}"#.to_string());
                }
            };
            let result = match request.op.as_str() {
                "+" => request.a + request.b,
                "-" => request.a - request.b,
                "*" => request.a * request.b,
                "/" if request.b != 0.0 => request.a / request.b,
                _ => {
                    warn!(op = %request.op, "calculate request rejected: bad operator");
                    return Some(r#"{"success":false}"#.to_string());
                }
            };
            let response = CalcResponse {
                expression: format!("{} {} {}", request.a, request.op, request.b),
                result,
                success: true,
            };
            codec.encode(&response).ok()
        })
        .expect("channel name is non-empty");

    bridge
        .on("system:info", |_, _| {
            Some(format!(
                r#"{{"os":"{}","arch":"{}"}}"#,
                std::env::consts::OS,
                std::env::consts::ARCH
            ))
        })
        .expect("channel name is non-empty");
}

fn main() {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("celadon=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "celadon=info".parse().unwrap()),
            ),
        )
        .init();

    info!("Celadon v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => celadon_app::config::load_from_path(std::path::Path::new(path)),
        None => celadon_app::config::load_default(),
    }
    .unwrap_or_else(|e| {
        warn!("config load failed, using defaults: {e}");
        AppConfig::default()
    });

    let mut app = App::new(config);
    register_demo_handlers(&app);

    if let Some(dir) = &args.content_dir {
        match app.content_mut().mount("app", dir) {
            Ok(()) => {
                let url = app.content().mount_url("app").unwrap_or_default();
                info!(%url, "content mounted");
            }
            Err(e) => warn!("content mount failed: {e}"),
        }
    }

    app.on_ready(|app| {
        let mut options = app.config().window.clone();
        options.title = "Celadon Demo".into();
        let id = match app.create_window(options) {
            Ok(id) => id,
            Err(e) => {
                warn!("window creation failed: {e}");
                return;
            }
        };
        let session = app.session(id).expect("session opens with its window");

        // Channel subscription: the raw contract.
        let result = session.subscribe("demo:greet:response", |delivery| {
            info!(payload = %delivery.payload(), "greet reply");
        });
        if let Err(e) = result {
            warn!("subscribe failed: {e}");
        }
        if let Err(e) = session.invoke("demo:greet", "Celadon") {
            warn!("invoke failed: {e}");
        }

        // Correlated reply: the redesigned contract.
        let result = session.invoke_with("demo:calculate", r#"{"a":6,"b":7,"op":"*"}"#, |delivery| {
            info!(payload = %delivery.payload(), "calculate reply");
        });
        if let Err(e) = result {
            warn!("invoke failed: {e}");
        }

        // Content asking its own window to minimize.
        if let Err(e) = session.notify(WINDOW_ACTION_CHANNEL, "minimize") {
            warn!("notify failed: {e}");
        }

        // What an embedder would feed in from a real page: the serialized
        // envelope wire format posted by the injected bridge object.
        let raw = r#"{"kind":"notification","channel":"system:info","payload":""}"#;
        match Envelope::from_json(raw) {
            Some(envelope) => app.bridge().ingest(id, envelope),
            None => warn!("wire envelope failed to parse"),
        }
    });

    app.start();
    let work = app.run_until_idle();
    info!(work, "demo traffic drained");

    for (window, command) in app.drain_window_commands() {
        info!(%window, ?command, "window command for the native layer");
    }

    app.shutdown();
    app.run_until_idle();
    info!("Shutdown complete");
}
