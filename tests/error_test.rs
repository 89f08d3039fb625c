//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use pue_collector::error::CollectorError;

/// CollectorErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        CollectorError::Config("Home-Verzeichnis nicht gefunden".to_string()),
        CollectorError::MissingPayload,
        CollectorError::UnsupportedFormat("xml".to_string()),
        CollectorError::InvalidRecord("Eintrag 1 ist kein Objekt".to_string()),
        CollectorError::SheetNotFound("Geräte".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// パース前に弾くエラーだけが bad request
#[test]
fn test_bad_request_classification() {
    assert!(CollectorError::MissingPayload.is_bad_request());
    assert!(CollectorError::UnsupportedFormat("xml".into()).is_bad_request());
    assert!(!CollectorError::SheetNotFound("Geräte".into()).is_bad_request());

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(!CollectorError::from(json_err).is_bad_request());
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CollectorError = io_err.into();

    assert!(matches!(err, CollectorError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CollectorError = json_err.into();

    assert!(matches!(err, CollectorError::JsonParse(_)));
    assert!(format!("{}", err).starts_with("JSON-Parsing-Fehler"));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = pue_common::Error::Excel("Excel保存エラー".to_string());
    let err: CollectorError = common_err.into();

    assert!(matches!(err, CollectorError::Common(_)));
    assert!(format!("{}", err).contains("Excel保存エラー"));
}
