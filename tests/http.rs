use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ChartsResponse {
    state: String,
    sources: Sources,
    plugins: Vec<String>,
    mounts: Vec<MountView>,
}

#[derive(Debug, Deserialize)]
struct Sources {
    library: Option<String>,
    plugin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MountView {
    mount: String,
    chart: Option<ChartView>,
    hidden: bool,
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartView {
    id: u64,
    config: Value,
    annotations: Annotations,
}

#[derive(Debug, Deserialize)]
struct Annotations {
    value_labels: Vec<Vec<Option<String>>>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("gymtrack_http_{}_{}", std::process::id(), nanos));
    path
}

/// A data file with a few fields filled in and a static dir holding both
/// vendor scripts, so no network is needed.
fn prepare_fixtures() -> (PathBuf, PathBuf) {
    let root = unique_dir();
    let vendor = root.join("static/js/vendor");
    std::fs::create_dir_all(&vendor).unwrap();
    std::fs::write(vendor.join("chart.min.js"), "window.Chart = function () {};").unwrap();
    std::fs::write(vendor.join("chartjs-plugin-datalabels.min.js"), "window.ChartDataLabels = {};")
        .unwrap();

    let snapshot = serde_json::json!({
        "fields": {
            "datos-meses": "[\"Ene\", \"Feb\"]",
            "datos-ingresos-membresias": "[100000, 200000]",
            "datos-ingresos-productos": "[50000, NaN]",
            "datos-margenes": "[20, 25]",
            "datos-ingresos-netos": "[120000, 180000]",
            "datos-planes-nombres": "[\"Mensual\", \"Anual\"]",
            "datos-planes": "[4, 4]",
            "datos-ingresos-potenciales-plan": "[400000, 900000]",
            "datos-productos-nombres": "[\"Agua\"]",
            "datos-productos-cantidades": "[12]",
            "datos-productos-ingresos": "[24000]",
            "datos-productos-margenes": "[9600]"
        }
    });
    let data_path = root.join("finance.json");
    std::fs::write(&data_path, serde_json::to_vec(&snapshot).unwrap()).unwrap();
    (data_path, root.join("static"))
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/charts")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let (data_path, static_dir) = prepare_fixtures();
    let child = Command::new(env!("CARGO_BIN_EXE_gymtrack_charts"))
        .env("PORT", port.to_string())
        .env("GYMTRACK_DATA_PATH", data_path)
        .env("GYMTRACK_STATIC_DIR", static_dir)
        .env("GYMTRACK_SETTLE_MS", "0")
        .env("GYMTRACK_ANCHOR_RETRY_MS", "10")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn charts(client: &Client, server: &TestServer) -> ChartsResponse {
    client
        .get(format!("{}/api/charts", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn mount<'a>(response: &'a ChartsResponse, id: &str) -> &'a MountView {
    response
        .mounts
        .iter()
        .find(|m| m.mount == id)
        .expect("missing mount")
}

#[tokio::test]
async fn http_startup_draws_all_charts_from_local_scripts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = charts(&client, &server).await;

    assert_eq!(response.state, "ready");
    assert_eq!(response.sources.library.as_deref(), Some("/static/js/vendor/chart.min.js"));
    assert_eq!(
        response.sources.plugin.as_deref(),
        Some("/static/js/vendor/chartjs-plugin-datalabels.min.js")
    );
    assert_eq!(response.plugins, vec!["data_labels"]);
    assert_eq!(response.mounts.len(), 4);
    for view in &response.mounts {
        assert!(view.chart.is_some(), "no chart on {}", view.mount);
        assert!(!view.hidden);
        assert!(view.errors.is_empty());
    }

    let trend = mount(&response, "graficoIngresos").chart.as_ref().unwrap();
    assert_eq!(trend.config["data"]["datasets"][1]["data"], serde_json::json!([50000.0, 0.0]));
}

#[tokio::test]
async fn http_reload_rereads_updated_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = charts(&client, &server).await;
    let before_id = mount(&before, "graficoPlan").chart.as_ref().unwrap().id;

    let update = client
        .post(format!("{}/api/fields", server.base_url))
        .json(&serde_json::json!({
            "fields": {
                "datos-planes-nombres": "[\"Mensual\", \"Diario\", \"Anual\"]",
                "datos-planes": "[3, 0, 7]"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::NO_CONTENT);

    let reloaded: ChartsResponse = client
        .post(format!("{}/api/charts/reload", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let plan = mount(&reloaded, "graficoPlan").chart.as_ref().unwrap();
    assert_ne!(plan.id, before_id);
    assert_eq!(
        plan.annotations.value_labels[0],
        vec![Some("30%".to_string()), Some("0%".to_string()), Some("70%".to_string())]
    );
    assert!(reloaded.mounts.iter().all(|m| m.chart.is_some()));
}

#[tokio::test]
async fn http_unknown_field_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/fields", server.base_url))
        .json(&serde_json::json!({ "fields": { "datos-secretos": "[1]" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_index_serves_page_and_static_scripts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"id="datos-planes""#));
    assert!(html.contains(r#"<canvas id="graficoIngresosProductos""#));
    assert!(html.contains(r#"<script src="/static/js/vendor/chart.min.js"></script>"#));

    let script = client
        .get(format!("{}/static/js/vendor/chart.min.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(script.status().is_success());

    let missing = client
        .get(format!("{}/static/js/vendor/nope.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
