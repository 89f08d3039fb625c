use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Konfigurationsfehler: {0}")]
    Config(String),

    #[error("Keine Daten empfangen")]
    MissingPayload,

    #[error("Ungültiges Format: {0}")]
    UnsupportedFormat(String),

    #[error("JSON-Parsing-Fehler: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSV-Parsing-Fehler: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("Ungültiger Datensatz: {0}")]
    InvalidRecord(String),

    #[error("Excel-Lesefehler: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    #[error("Tabellenblatt nicht gefunden: {0}")]
    SheetNotFound(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pue_common::Error),
}

impl CollectorError {
    /// パース前に弾かれるリクエストか（HTTP 400）
    ///
    /// パース失敗・ストア失敗は 500 として扱う
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            CollectorError::MissingPayload | CollectorError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
