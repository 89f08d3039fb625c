//! レコード・セルの型定義
//!
//! - Record: 入力レコード（型なしのキー/値マップ）
//! - Cell: 保存される1セル
//! - Row: 20列の正規化済み行
//! - SheetGrid: 読み込んだシート全体（ヘッダー行を含む）

use crate::schema::ColumnDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 入力レコード
///
/// 余分なキーや欠けたキーがあってもエラーにしない
pub type Record = serde_json::Map<String, Value>;

/// 正規化済みの行
pub type Row = Vec<Cell>;

/// セル値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 表示用テキスト（空セルは空文字列）
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::String(s) => Cell::Text(s.clone()),
            // スカラー列にネスト値が来た場合はJSON文字列として残す
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// 整数値は小数点なしで表示
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// シート1枚分のセル（行優先、0始まり）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Row>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// ヘッダー行のみのシート
    pub fn with_header(name: impl Into<String>, columns: &[ColumnDefinition]) -> Self {
        Self {
            name: name.into(),
            rows: vec![columns.iter().map(|c| Cell::from(c.header)).collect()],
        }
    }

    /// 最終使用行の次の行番号
    pub fn next_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// 指定位置にセルを書き込む（必要に応じて行・列を拡張）
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize(col + 1, Cell::Empty);
        }
        r[col] = cell;
    }

    /// 1行目（ヘッダー）
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// ヘッダー名から列番号を検索
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.header()?
            .iter()
            .position(|c| matches!(c, Cell::Text(s) if s == header))
    }

    /// ヘッダーを除いた、空でないデータ行
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows
            .iter()
            .skip(1)
            .filter(|row| row.iter().any(|c| !c.is_empty()))
    }
}
