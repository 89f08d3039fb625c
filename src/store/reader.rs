//! xlsx読み込み（calamine）
//!
//! ファイル全体をメモリ上の SheetGrid に展開する。セル位置は絶対位置を保つ。

use crate::error::Result;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use pue_common::{Cell, SheetGrid};
use std::path::Path;

/// 全シートを読み込む（シート順を保持）
pub fn load_workbook(path: &Path) -> Result<Vec<SheetGrid>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(range_to_grid(name, &range));
    }

    Ok(sheets)
}

fn range_to_grid(name: String, range: &Range<Data>) -> SheetGrid {
    let mut grid = SheetGrid::new(name);

    // Range は最初の使用セルから始まるので絶対位置に戻す
    let Some((start_row, start_col)) = range.start() else {
        return grid;
    };

    for (r, c, data) in range.used_cells() {
        grid.set(
            start_row as usize + r,
            start_col as usize + c,
            data_to_cell(data),
        );
    }

    grid
}

/// calamineのセル値を変換
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // シリアル値のまま保持（書式は再書き込みで失われる）
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(data_to_cell(&Data::String("USV".into())), Cell::Text("USV".into()));
        assert_eq!(data_to_cell(&Data::Int(5)), Cell::Number(5.0));
        assert_eq!(data_to_cell(&Data::Float(96.5)), Cell::Number(96.5));
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_datetime_keeps_serial_value() {
        let dt = calamine::ExcelDateTime::new(
            45_310.4375,
            calamine::ExcelDateTimeType::DateTime,
            false,
        );
        assert_eq!(data_to_cell(&Data::DateTime(dt)), Cell::Number(45_310.4375));
    }

    #[test]
    fn test_range_offset_is_preserved() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Hersteller".into()));
        range.set_value((3, 2), Data::Float(1.0));

        let grid = range_to_grid("Geräte".into(), &range);
        assert_eq!(grid.rows.len(), 4);
        assert_eq!(grid.rows[2][1], Cell::Text("Hersteller".into()));
        assert_eq!(grid.rows[3][2], Cell::Number(1.0));
        assert_eq!(grid.next_row(), 4);
    }
}
