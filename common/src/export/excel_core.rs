//! Excel生成（共通ライブラリ）
//!
//! 読み込んだシート群をそのままxlsxとして書き直す。
//! ストア用シートにはヘッダー書式と列幅を付ける（見た目のみ）。

use crate::error::{Error, Result};
use crate::schema::{ColumnDefinition, HEADER_FILL_RGB};
use crate::types::{Cell, SheetGrid};
use rust_xlsxwriter::*;

/// ヘッダー書式（白太字・青背景・中央揃え）
fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL_RGB))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn excel_err(context: &str, e: XlsxError) -> Error {
    Error::Excel(format!("{}: {}", context, e))
}

/// ワークブックをバッファに生成
///
/// # Arguments
/// * `sheets` - 書き出すシート（順序を保つ）
/// * `store_sheet` - ヘッダー書式・列幅を付けるシート名
/// * `columns` - 列定義（列幅とヘッダー判定に使用）
pub fn generate_workbook_buffer(
    sheets: &[SheetGrid],
    store_sheet: &str,
    columns: &[ColumnDefinition],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = header_format();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| excel_err("シート名設定エラー", e))?;

        let is_store = sheet.name == store_sheet;

        if is_store {
            for (col, column) in columns.iter().enumerate() {
                worksheet
                    .set_column_width(col as u16, column.width)
                    .map_err(|e| excel_err("列幅設定エラー", e))?;
            }
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (r, c) = (row_idx as u32, col_idx as u16);
                let result = match cell {
                    Cell::Empty => continue,
                    Cell::Text(s) if s.is_empty() => continue,
                    Cell::Text(s) if is_store && row_idx == 0 => {
                        worksheet.write_string_with_format(r, c, s, &header_format)
                    }
                    Cell::Text(s) => worksheet.write_string(r, c, s),
                    Cell::Number(n) => worksheet.write_number(r, c, *n),
                    Cell::Bool(b) => worksheet.write_boolean(r, c, *b),
                };
                result.map_err(|e| excel_err("セル書き込みエラー", e))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| excel_err("Excel保存エラー", e))
}
