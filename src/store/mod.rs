//! Excelストア
//!
//! 1ファイル・1シートの表形式ストア。書き込みは毎回
//! 「全体読み込み → メモリ上で追記 → ファイル全体を上書き」の1経路のみ。
//!
//! ## 同時書き込み
//! ロック・トランザクション・アトミックなリネームは行わない。
//! 同じファイルへ同時に追記すると、後から保存した側が勝ち、
//! 先に保存した側の行は黙って失われる（last-writer-wins）。

pub mod reader;

use crate::error::{CollectorError, Result};
use pue_common::export::excel_core::generate_workbook_buffer;
use pue_common::{summarize_grid, ColumnDefinition, Row, SheetGrid, Summary, COLUMNS};
use std::path::{Path, PathBuf};

/// ダウンロード時のファイル名接頭辞
pub const EXPORT_FILE_PREFIX: &str = "PUE_Datenbank";

/// ストアファイルがなければヘッダー付きで作成する
///
/// 既にあれば何もしない（既存ファイルの列は検証しない）。
///
/// # Returns
/// * `Ok(true)` - 新規作成した
/// * `Ok(false)` - 既に存在した
pub fn ensure_store(path: &Path, sheet_name: &str, columns: &[ColumnDefinition]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let grid = SheetGrid::with_header(sheet_name, columns);
    save_workbook(path, &[grid], sheet_name, columns)?;
    tracing::info!(path = %path.display(), sheet = sheet_name, "Excel-Datei erstellt");
    Ok(true)
}

/// 行を追記してファイル全体を書き直す
///
/// # Returns
/// 書き込んだ行数
pub fn append(
    path: &Path,
    sheet_name: &str,
    columns: &[ColumnDefinition],
    rows: &[Row],
) -> Result<usize> {
    let mut sheets = reader::load_workbook(path)?;
    let sheet = sheets
        .iter_mut()
        .find(|s| s.name == sheet_name)
        .ok_or_else(|| CollectorError::SheetNotFound(sheet_name.to_string()))?;

    let mut next_row = sheet.next_row();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                sheet.set(next_row, col, cell.clone());
            }
        }
        next_row += 1;
    }

    save_workbook(path, &sheets, sheet_name, columns)?;
    tracing::info!(rows = rows.len(), path = %path.display(), "Datensätze hinzugefügt");
    Ok(rows.len())
}

/// 集計（読み取りのみ）
pub fn summarize(path: &Path, sheet_name: &str) -> Result<Summary> {
    let sheet = load_sheet(path, sheet_name)?;
    Ok(summarize_grid(&sheet))
}

/// 指定シートだけを読み込む
pub fn load_sheet(path: &Path, sheet_name: &str) -> Result<SheetGrid> {
    reader::load_workbook(path)?
        .into_iter()
        .find(|s| s.name == sheet_name)
        .ok_or_else(|| CollectorError::SheetNotFound(sheet_name.to_string()))
}

fn save_workbook(
    path: &Path,
    sheets: &[SheetGrid],
    sheet_name: &str,
    columns: &[ColumnDefinition],
) -> Result<()> {
    let buffer = generate_workbook_buffer(sheets, sheet_name, columns)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

/// ダウンロード用ファイル名（例: PUE_Datenbank_20260118_103000.xlsx）
pub fn export_file_name<Tz>(now: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.xlsx", EXPORT_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// ストアへのハンドル
///
/// プロセス内で1つ作って各エントリポイントに渡す。
/// 状態はファイルのみで、メモリ上のキャッシュは持たない。
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    sheet_name: String,
    columns: &'static [ColumnDefinition],
}

impl Store {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
            columns: COLUMNS,
        }
    }

    /// ハンドルを作り、ファイルがなければ作成する
    pub fn open(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Result<Self> {
        let store = Self::new(path, sheet_name);
        store.ensure()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn ensure(&self) -> Result<bool> {
        ensure_store(&self.path, &self.sheet_name, self.columns)
    }

    pub fn append(&self, rows: &[Row]) -> Result<usize> {
        append(&self.path, &self.sheet_name, self.columns, rows)
    }

    pub fn summarize(&self) -> Result<Summary> {
        summarize(&self.path, &self.sheet_name)
    }

    pub fn load_sheet(&self) -> Result<SheetGrid> {
        load_sheet(&self.path, &self.sheet_name)
    }

    /// ファイル内容をそのまま返す（ダウンロード用）
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}
