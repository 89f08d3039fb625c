//! 取り込みアダプタ
//!
//! 生の入力（JSONまたはCSVテキスト）をレコード列に変換し、
//! 正規化してストアへ追記する。
//!
//! ## 処理フロー
//! 1. 空入力・未対応フォーマットをパース前に弾く
//! 2. JSON/CSVをレコード列にパース（失敗時はファイルに触れない）
//! 3. バッチ共通のタイムスタンプで正規化
//! 4. ストアへ追記
//!
//! どの失敗も `IngestOutcome { success: false, message }` に変換され、
//! 呼び出し側へエラーとして伝播しない。

use crate::error::{CollectorError, Result};
use crate::store::Store;
use pue_common::{normalize_batch, Record};
use serde::Serialize;
use serde_json::Value;

/// タイムスタンプ書式（文字列比較で時系列順になる）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 入力フォーマット
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IngestFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for IngestFormat {
    type Err = CollectorError;

    /// 完全一致のみ受け付ける（"JSON" や " json " は不正）
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(IngestFormat::Json),
            "csv" => Ok(IngestFormat::Csv),
            _ => Err(CollectorError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for IngestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestFormat::Json => write!(f, "json"),
            IngestFormat::Csv => write!(f, "csv"),
        }
    }
}

/// 取り込み結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub rows_written: usize,
    /// 失敗時のHTTPステータス判定用
    #[serde(skip)]
    pub bad_request: bool,
}

impl IngestOutcome {
    fn ok(rows_written: usize) -> Self {
        Self {
            success: true,
            message: format!(
                "✓ {} Datensätze erfolgreich zur Excel-Datei hinzugefügt!",
                rows_written
            ),
            rows_written,
            bad_request: false,
        }
    }

    fn failed(err: &CollectorError) -> Self {
        let bad_request = err.is_bad_request();
        let message = if bad_request {
            err.to_string()
        } else {
            format!("Fehler beim Hinzufügen der Daten: {}", err)
        };
        Self {
            success: false,
            message,
            rows_written: 0,
            bad_request,
        }
    }
}

/// バッチ共通のタイムスタンプ（ローカル時刻）
pub fn batch_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// JSONテキストをレコード列にパース
///
/// 単一オブジェクトは1件のバッチとして扱う。
/// オブジェクト以外の要素が含まれていればバッチ全体を拒否する。
pub fn parse_json_records(data: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(data)?;

    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(CollectorError::InvalidRecord(format!(
                    "Eintrag {} ist kein Objekt: {}",
                    i + 1,
                    other
                ))),
            })
            .collect(),
        other => Err(CollectorError::InvalidRecord(format!(
            "Erwartet Objekt oder Liste, erhalten: {}",
            other
        ))),
    }
}

/// CSVテキストをレコード列にパース
///
/// 1行目をヘッダーとし、各データ行が1レコード（ネスト構文なし）。
/// 空欄は null、数値に見える値は数値になる。
/// ヘッダーより短い行の不足分は null、長い行はエラー。
pub fn parse_csv_records(data: &str) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() > headers.len() {
            return Err(CollectorError::InvalidRecord(format!(
                "CSV-Zeile {} hat {} Felder, erwartet höchstens {}",
                i + 2,
                row.len(),
                headers.len()
            )));
        }
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(col, key)| (key.to_string(), row.get(col).map_or(Value::Null, csv_value)))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// 欠損値として扱うCSVトークン
const CSV_NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// CSVセル文字列の型推定
fn csv_value(raw: &str) -> Value {
    if CSV_NA_TOKENS.contains(&raw) {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    }
    match raw {
        "True" | "true" | "TRUE" => Value::Bool(true),
        "False" | "false" | "FALSE" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// フォーマットに応じてパース
pub fn parse_records(data: &str, format: IngestFormat) -> Result<Vec<Record>> {
    match format {
        IngestFormat::Json => parse_json_records(data),
        IngestFormat::Csv => parse_csv_records(data),
    }
}

/// パース済みレコードを正規化して追記
pub fn append_records(store: &Store, records: &[Record]) -> Result<usize> {
    let timestamp = batch_timestamp();
    let rows = normalize_batch(records, &timestamp);
    store.append(&rows)
}

/// 取り込み本体（エラーを返す版）
pub fn try_ingest(store: &Store, data: Option<&str>, format: &str) -> Result<usize> {
    let data = data
        .filter(|d| !d.trim().is_empty())
        .ok_or(CollectorError::MissingPayload)?;
    let format: IngestFormat = format.parse()?;

    let records = parse_records(data, format)?;
    append_records(store, &records)
}

/// 取り込みエントリポイント
///
/// # Arguments
/// * `store` - ストアハンドル
/// * `data` - 入力テキスト
/// * `format` - "json" または "csv"
pub fn ingest(store: &Store, data: Option<&str>, format: &str) -> IngestOutcome {
    match try_ingest(store, data, format) {
        Ok(rows) => IngestOutcome::ok(rows),
        Err(e) => {
            tracing::warn!(input_format = format, error = %e, "Daten konnten nicht hinzugefügt werden");
            IngestOutcome::failed(&e)
        }
    }
}
