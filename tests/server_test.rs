//! HTTPエンドポイントの統合テスト
//!
//! 127.0.0.1 のランダムポートでルーターを起動し、reqwest で呼び出す

use pue_collector::server;
use pue_collector::Store;
use pue_common::schema::DEFAULT_SHEET_NAME;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    store: Store,
    _dir: TempDir,
}

async fn start_server() -> TestServer {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = Store::open(dir.path().join("pue.xlsx"), DEFAULT_SHEET_NAME).expect("ストア作成失敗");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");

    let app = server::router(store.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("サーバー停止");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        store,
        _dir: dir,
    }
}

async fn stats(base_url: &str) -> Value {
    reqwest::get(format!("{}/api/stats", base_url))
        .await
        .expect("リクエスト失敗")
        .json()
        .await
        .expect("JSONパース失敗")
}

#[tokio::test]
async fn test_index_page() {
    let srv = start_server().await;

    let response = reqwest::get(&srv.base_url).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("PUE Datenbank"));
}

#[tokio::test]
async fn test_add_and_stats() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let data = json!([
        {"Hersteller": "A", "Produktkategorie": "X"},
        {"Hersteller": "A", "Produktkategorie": "Y"},
        {"Hersteller": "B", "Produktkategorie": "X"}
    ])
    .to_string();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .json(&json!({"data": data, "format": "json"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let stats = stats(&srv.base_url).await;
    assert_eq!(stats["Gesamtanzahl"], 3);
    assert_eq!(stats["Hersteller"], 2);
    assert_eq!(stats["Produktkategorien"], 2);
    assert!(stats["Letzte_Aktualisierung"].is_string());
}

#[tokio::test]
async fn test_add_csv() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .json(&json!({"data": "Hersteller,Produktkategorie\nStulz,Klima\n", "format": "csv"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(srv.store.summarize().unwrap().total_rows, 1);
}

#[tokio::test]
async fn test_add_rejects_unknown_format() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .json(&json!({"data": "<x/>", "format": "xml"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    assert_eq!(stats(&srv.base_url).await["Gesamtanzahl"], 0);
}

#[tokio::test]
async fn test_add_missing_data() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .json(&json!({"format": "json"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Keine Daten empfangen");
}

#[tokio::test]
async fn test_add_falsy_data_is_missing() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    for data in [json!(false), json!(0)] {
        let response = client
            .post(format!("{}/api/add", srv.base_url))
            .json(&json!({"data": data, "format": "json"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Keine Daten empfangen");
    }
}

#[tokio::test]
async fn test_add_malformed_json_is_server_error() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .json(&json!({"data": "{ kaputt", "format": "json"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_add_invalid_request_body() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/add", srv.base_url))
        .header("Content-Type", "application/json")
        .body("nicht json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_download() {
    let srv = start_server().await;

    let response = reqwest::get(format!("{}/api/download", srv.base_url)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        server::XLSX_MIME
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"PUE_Datenbank_"));
    assert!(disposition.ends_with(".xlsx\""));

    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.as_ref(), std::fs::read(srv.store.path()).unwrap().as_slice());
}

#[tokio::test]
async fn test_stats_failure_returns_zeros() {
    let srv = start_server().await;
    std::fs::remove_file(srv.store.path()).unwrap();

    let stats = stats(&srv.base_url).await;
    assert_eq!(stats["Gesamtanzahl"], 0);
    assert!(stats["Letzte_Aktualisierung"].is_null());
    assert!(stats["error"].is_string());
}

#[tokio::test]
async fn test_legacy_upload_json_and_csv() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/upload", srv.base_url))
        .json(&json!([{"Hersteller": "A"}, {"Hersteller": "B"}]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Data uploaded successfully!");

    let response = client
        .post(format!("{}/upload", srv.base_url))
        .header("Content-Type", "text/csv")
        .body("Hersteller\nC\n")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(srv.store.summarize().unwrap().total_rows, 3);
}

#[tokio::test]
async fn test_legacy_upload_rejects_other_types() {
    let srv = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/upload", srv.base_url))
        .header("Content-Type", "application/xml")
        .body("<x/>")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid input format"));
}
