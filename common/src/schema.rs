//! 列スキーマ定義
//!
//! PUEデータベースの20列レイアウト（Source of Truth）。
//! 列順は一度ファイルを作成したら変更しないこと。

/// 既定のExcelファイル名
pub const DEFAULT_EXCEL_FILE: &str = "PUE_Datenbank.xlsx";

/// 既定のシート名
pub const DEFAULT_SHEET_NAME: &str = "Geräte";

/// ヘッダー背景色
pub const HEADER_FILL_RGB: u32 = 0x366092;

/// 入力レコードのネストキー
pub const PARTIAL_LOAD_KEY: &str = "Teillastdaten";
pub const SOURCE_KEY: &str = "Quelle";
pub const MISSING_FIELDS_KEY: &str = "Fehlende_Angaben";

/// 集計で参照する列名
pub const MANUFACTURER_HEADER: &str = "Hersteller";
pub const CATEGORY_HEADER: &str = "Produktkategorie";
pub const TIMESTAMP_HEADER: &str = "Zeitstempel";

/// セル値の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// レコード直下のキー
    Flat(&'static str),
    /// `Teillastdaten` 内のキー（"25%" など）
    PartialLoad(&'static str),
    /// `Quelle` 内のキー
    Source(&'static str),
    /// `Fehlende_Angaben` 配列（", " 連結）
    MissingFields,
    /// バッチのタイムスタンプ
    Timestamp,
}

/// 列定義
#[derive(Debug, Clone, Copy)]
pub struct ColumnDefinition {
    pub header: &'static str,
    /// 表示幅（Excel文字幅単位、見た目のみ）
    pub width: f64,
    pub source: FieldSource,
}

/// PUEデータベースの列（Excel列 A..T）
pub const COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { header: "Hersteller", width: 15.0, source: FieldSource::Flat("Hersteller") },
    ColumnDefinition { header: "Produktkategorie", width: 20.0, source: FieldSource::Flat("Produktkategorie") },
    ColumnDefinition { header: "Produktfamilie", width: 20.0, source: FieldSource::Flat("Produktfamilie") },
    ColumnDefinition { header: "Modellbezeichnung", width: 25.0, source: FieldSource::Flat("Modellbezeichnung") },
    ColumnDefinition { header: "Nennleistung", width: 15.0, source: FieldSource::Flat("Nennleistung") },
    ColumnDefinition { header: "Kühlleistung", width: 15.0, source: FieldSource::Flat("Kühlleistung") },
    ColumnDefinition { header: "Elektrische Aufnahmeleistung", width: 20.0, source: FieldSource::Flat("Elektrische Aufnahmeleistung") },
    ColumnDefinition { header: "Wirkungsgrad_oder_Verlustleistung", width: 25.0, source: FieldSource::Flat("Wirkungsgrad_oder_Verlustleistung") },
    ColumnDefinition { header: "COP_EER_IPLV", width: 15.0, source: FieldSource::Flat("COP_EER_IPLV") },
    ColumnDefinition { header: "Teillast_25%", width: 12.0, source: FieldSource::PartialLoad("25%") },
    ColumnDefinition { header: "Teillast_50%", width: 12.0, source: FieldSource::PartialLoad("50%") },
    ColumnDefinition { header: "Teillast_75%", width: 12.0, source: FieldSource::PartialLoad("75%") },
    ColumnDefinition { header: "Teillast_100%", width: 12.0, source: FieldSource::PartialLoad("100%") },
    ColumnDefinition { header: "Betriebsbedingungen", width: 30.0, source: FieldSource::Flat("Betriebsbedingungen") },
    ColumnDefinition { header: "Quelle_Dateiname", width: 20.0, source: FieldSource::Source("Dateiname") },
    ColumnDefinition { header: "Quelle_Seitenzahl", width: 12.0, source: FieldSource::Source("Seitenzahl") },
    ColumnDefinition { header: "Quelle_Zitat", width: 50.0, source: FieldSource::Source("Zitat") },
    ColumnDefinition { header: "Fehlende_Angaben", width: 30.0, source: FieldSource::MissingFields },
    ColumnDefinition { header: "Verarbeitungsfehler", width: 30.0, source: FieldSource::Flat("Verarbeitungsfehler") },
    ColumnDefinition { header: "Zeitstempel", width: 20.0, source: FieldSource::Timestamp },
];

/// ヘッダー名の一覧
pub fn headers() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|c| c.header)
}
