//! HTTPサーバー（axum）
//!
//! - `GET  /`             入力ページ
//! - `POST /api/add`      `{"data": "...", "format": "json"|"csv"}` を追記
//! - `GET  /api/stats`    集計
//! - `GET  /api/download` xlsxをダウンロード
//! - `POST /upload`       旧エンドポイント（JSON本文またはCSV本文）
//!
//! ストア操作はブロッキングI/Oなので `spawn_blocking` で実行する。
//! 排他制御はしない（同時追記は last-writer-wins）。

use crate::error::{CollectorError, Result};
use crate::ingest::{self, IngestOutcome};
use crate::store::{export_file_name, Store};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const INDEX_HTML: &str = include_str!("index.html");

type SharedStore = Arc<Store>;

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".into()
}

/// ルーター構築
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/add", post(add_data))
        .route("/api/stats", get(get_stats))
        .route("/api/download", get(download_excel))
        .route("/upload", post(upload_data))
        .with_state(Arc::new(store))
}

/// 指定アドレスで待ち受ける
pub async fn serve(store: Store, bind: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    serve_on(listener, store).await
}

pub async fn serve_on(listener: TcpListener, store: Store) -> std::io::Result<()> {
    tracing::info!(
        addr = %listener.local_addr()?,
        excel_file = %store.path().display(),
        "PUE Datenbank Server gestartet"
    );
    axum::serve(listener, router(store)).await
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CollectorError::Io(std::io::Error::other(e)))?
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// リクエストの data を入力テキストに変換
///
/// 文字列以外（オブジェクト・配列）はJSONテキストとして扱う。
/// null・false・0・空の配列/オブジェクトは「データなし」。
fn payload_text(data: &Value) -> Option<String> {
    match data {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn outcome_response(outcome: IngestOutcome) -> Response {
    let status = if outcome.success {
        StatusCode::OK
    } else if outcome.bad_request {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome)).into_response()
}

async fn add_data(
    State(store): State<SharedStore>,
    payload: std::result::Result<Json<AddRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            let body = json!({ "success": false, "message": format!("Fehler: {}", rejection.body_text()) });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let data = payload_text(&request.data);
    let format = request.format;

    let result = run_blocking(move || Ok(ingest::ingest(&store, data.as_deref(), &format))).await;

    match result {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => {
            tracing::error!(error = %e, "Ingestion-Task fehlgeschlagen");
            let body = json!({ "success": false, "message": format!("Fehler: {}", e) });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

async fn get_stats(State(store): State<SharedStore>) -> Response {
    match run_blocking(move || store.summarize()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Statistiken konnten nicht geladen werden");
            Json(json!({
                "Gesamtanzahl": 0,
                "Hersteller": 0,
                "Produktkategorien": 0,
                "Letzte_Aktualisierung": null,
                "error": e.to_string(),
            }))
            .into_response()
        }
    }
}

async fn download_excel(State(store): State<SharedStore>) -> Response {
    match run_blocking(move || store.read_bytes()).await {
        Ok(bytes) => {
            let file_name = export_file_name(&chrono::Local::now());
            let headers = [
                (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ];
            (headers, bytes).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Download fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// 旧エンドポイント: Content-Type でJSON/CSVを判別
async fn upload_data(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let format = if content_type.starts_with("application/json") {
        ingest::IngestFormat::Json
    } else if content_type.starts_with("text/csv") {
        ingest::IngestFormat::Csv
    } else {
        return invalid_upload();
    };

    let Ok(text) = String::from_utf8(body.to_vec()) else {
        return invalid_upload();
    };

    let result = run_blocking(move || {
        let records = ingest::parse_records(&text, format)?;
        ingest::append_records(&store, &records)
    })
    .await;

    match result {
        Ok(rows) => {
            tracing::debug!(rows, "Upload verarbeitet");
            (
                StatusCode::OK,
                Json(json!({ "message": "Data uploaded successfully!" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Upload fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn invalid_upload() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid input format. Please submit JSON or a CSV file." })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_text() {
        assert_eq!(payload_text(&Value::Null), None);
        assert_eq!(payload_text(&json!("a,b")), Some("a,b".to_string()));
        assert_eq!(payload_text(&json!([])), None);
        assert_eq!(payload_text(&json!(false)), None);
        assert_eq!(payload_text(&json!(0)), None);
        assert_eq!(payload_text(&json!(0.0)), None);
        assert_eq!(payload_text(&json!(1)), Some("1".to_string()));
        assert_eq!(
            payload_text(&json!({"Hersteller": "A"})),
            Some(r#"{"Hersteller":"A"}"#.to_string())
        );
    }

    #[test]
    fn test_add_request_defaults_to_json() {
        let request: AddRequest = serde_json::from_str(r#"{"data": "{}"}"#).unwrap();
        assert_eq!(request.format, "json");
    }
}
