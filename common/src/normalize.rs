//! レコード正規化
//!
//! 入力レコード（ネストあり）を20列の行に平坦化する。
//! 型・範囲のチェックは行わない。欠けたフィールドや形の違うネスト値は
//! 空セルになるだけで、エラーにはならない。

use crate::schema::{
    ColumnDefinition, FieldSource, COLUMNS, MISSING_FIELDS_KEY, PARTIAL_LOAD_KEY, SOURCE_KEY,
};
use crate::types::{Cell, Record, Row};
use serde_json::Value;

/// 欠落フィールド一覧の区切り文字
pub const MISSING_FIELDS_SEPARATOR: &str = ", ";

/// 1レコードを正規化する
///
/// # Arguments
/// * `record` - 入力レコード
/// * `timestamp` - バッチ共通のタイムスタンプ
pub fn normalize(record: &Record, timestamp: &str) -> Row {
    normalize_with_columns(record, timestamp, COLUMNS)
}

/// 任意の列定義で正規化する
pub fn normalize_with_columns(
    record: &Record,
    timestamp: &str,
    columns: &[ColumnDefinition],
) -> Row {
    columns
        .iter()
        .map(|column| match column.source {
            FieldSource::Flat(key) => record.get(key).map(Cell::from).unwrap_or_default(),
            FieldSource::PartialLoad(key) => nested_cell(record, PARTIAL_LOAD_KEY, key),
            FieldSource::Source(key) => nested_cell(record, SOURCE_KEY, key),
            FieldSource::MissingFields => Cell::Text(join_missing_fields(record.get(MISSING_FIELDS_KEY))),
            FieldSource::Timestamp => Cell::Text(timestamp.to_string()),
        })
        .collect()
}

/// バッチ全体を正規化する（全行が同じタイムスタンプを持つ）
pub fn normalize_batch(records: &[Record], timestamp: &str) -> Vec<Row> {
    records.iter().map(|r| normalize(r, timestamp)).collect()
}

/// ネストしたマップから値を取り出す
///
/// 親がオブジェクトでなければ空セル
fn nested_cell(record: &Record, parent: &str, key: &str) -> Cell {
    record
        .get(parent)
        .and_then(Value::as_object)
        .and_then(|inner| inner.get(key))
        .map(Cell::from)
        .unwrap_or_default()
}

/// 欠落フィールド配列を ", " で連結
///
/// 配列以外・空配列は空文字列。null要素はスキップ。
pub fn join_missing_fields(value: Option<&Value>) -> String {
    let Some(Value::Array(items)) = value else {
        return String::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect::<Vec<_>>()
        .join(MISSING_FIELDS_SEPARATOR)
}
