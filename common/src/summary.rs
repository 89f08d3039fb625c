//! 集計
//!
//! 読み込み済みのシートから件数・メーカー数・カテゴリ数・最終更新を求める。

use crate::schema::{CATEGORY_HEADER, MANUFACTURER_HEADER, TIMESTAMP_HEADER};
use crate::types::SheetGrid;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// データベース概要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Gesamtanzahl")]
    pub total_rows: usize,

    #[serde(rename = "Hersteller")]
    pub distinct_manufacturers: usize,

    #[serde(rename = "Produktkategorien")]
    pub distinct_categories: usize,

    #[serde(rename = "Letzte_Aktualisierung")]
    pub last_timestamp: Option<String>,
}

/// シートを集計する
///
/// 列はヘッダー名で探す。列がなければ 0 / None。
pub fn summarize_grid(grid: &SheetGrid) -> Summary {
    let total_rows = grid.data_rows().count();

    Summary {
        total_rows,
        distinct_manufacturers: count_distinct(grid, MANUFACTURER_HEADER),
        distinct_categories: count_distinct(grid, CATEGORY_HEADER),
        last_timestamp: max_value(grid, TIMESTAMP_HEADER),
    }
}

fn column_values<'a>(grid: &'a SheetGrid, col: usize) -> impl Iterator<Item = String> + 'a {
    grid.data_rows()
        .filter_map(move |row| row.get(col))
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.as_text())
}

fn count_distinct(grid: &SheetGrid, header: &str) -> usize {
    let Some(col) = grid.column_index(header) else {
        return 0;
    };
    column_values(grid, col).collect::<HashSet<_>>().len()
}

/// タイムスタンプは "%Y-%m-%d %H:%M:%S" なので文字列比較で最大値が取れる
fn max_value(grid: &SheetGrid, header: &str) -> Option<String> {
    let col = grid.column_index(header)?;
    column_values(grid, col).max()
}
