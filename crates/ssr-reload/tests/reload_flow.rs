//! End-to-end tests for the reload protocol over a real listener.

use ssr_reload::{
    Asset, BuildHooks, BuildPlugin, ClientPlugin, ClientPluginOptions, Compilation,
    NativeFileSystem, PingOutcome, ReadinessState, ServerPlugin, ServerPluginOptions,
};
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn pick_available_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn client_options(port: u16) -> ClientPluginOptions {
    ClientPluginOptions {
        app_origin: Some("http://localhost:3000".to_string()),
        host: Some("127.0.0.1".to_string()),
        port: Some(port),
        protocol: Some("http".to_string()),
        template_matcher: Some("index.html".to_string()),
        reload_delay_ms: Some(250),
    }
}

fn server_options(port: u16) -> ServerPluginOptions {
    ServerPluginOptions {
        host: Some("127.0.0.1".to_string()),
        port: Some(port),
        protocol: Some("http".to_string()),
    }
}

/// Open an event-stream subscription on a background thread and forward its
/// non-empty lines.
fn subscribe(port: u16) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let url = format!("http://127.0.0.1:{port}/");
        let Ok(response) = ureq::get(url.as_str()).call() else {
            return;
        };
        let reader = BufReader::new(response.into_body().into_reader());
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if !line.is_empty() && tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn next_line(rx: &mut mpsc::UnboundedReceiver<String>) -> Option<String> {
    timeout(Duration::from_secs(5), rx.recv()).await.ok().flatten()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reload_fires_once_both_bundles_are_ready() {
    let port = pick_available_port();
    let client = ClientPlugin::new(client_options(port)).await.unwrap();
    let server = ServerPlugin::new(server_options(port)).unwrap();

    let mut events = subscribe(port);
    assert_eq!(
        next_line(&mut events).await.as_deref(),
        Some(format!("data: Connected to reload server at http://127.0.0.1:{port}").as_str())
    );

    // Server side alone does not reload
    assert_eq!(server.ping().await, PingOutcome::Acknowledged);
    assert!(timeout(Duration::from_millis(200), events.recv()).await.is_err());

    client.done().await;
    assert_eq!(next_line(&mut events).await.as_deref(), Some("data: reload"));
    assert_eq!(client.tracker().state(), ReadinessState::default());

    // Next cycle, client first
    client.done().await;
    server.done().await;
    assert_eq!(next_line(&mut events).await.as_deref(), Some("data: reload"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_subscriber_takes_over() {
    let port = pick_available_port();
    let client = ClientPlugin::new(client_options(port)).await.unwrap();

    let mut first = subscribe(port);
    assert!(next_line(&mut first).await.is_some());
    let mut second = subscribe(port);
    assert!(next_line(&mut second).await.is_some());

    client.tracker().mark_server_ready();
    client.done().await;

    assert_eq!(next_line(&mut second).await.as_deref(), Some("data: reload"));
    // The displaced stream was closed rather than notified
    assert_eq!(next_line(&mut first).await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_emit_cycle_injects_script_into_template() {
    let port = pick_available_port();
    let client = Arc::new(ClientPlugin::new(client_options(port)).await.unwrap());
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("public");

    let mut hooks = BuildHooks::new();
    hooks.register(client.clone());

    let mut compilation = Compilation::new(&out_dir)
        .with_asset(Asset::new(
            "index.html",
            "<html><body><div id=\"root\"></div></body></html>",
        ))
        .with_asset(Asset::new("static/app.js", "hydrate();"));

    hooks.run_emit(&mut compilation, &NativeFileSystem::new()).await;
    hooks.run_done().await;

    let html = std::fs::read_to_string(out_dir.join("index.html")).unwrap();
    assert!(html.contains(&format!("new EventSource(\"http://127.0.0.1:{port}\"")));
    assert!(html.contains("}, 250);"));
    assert_eq!(html.matches("</body>").count(), 1);
    assert!(html.find("<script>").unwrap() < html.find("</body>").unwrap());

    let js = std::fs::read_to_string(out_dir.join("static/app.js")).unwrap();
    assert_eq!(js, "hydrate();");

    assert!(client.tracker().state().client_ready);
}
