//! PUE Collector Common Library
//!
//! 列スキーマ・レコード正規化・集計・xlsx書き出し。
//! ファイルI/OやHTTPは持たない（ルートクレート側で扱う）。

pub mod types;
pub mod schema;
pub mod normalize;
pub mod summary;
pub mod error;
pub mod export;

pub use types::{Cell, Record, Row, SheetGrid};
pub use schema::{ColumnDefinition, FieldSource, COLUMNS};
pub use normalize::{normalize, normalize_batch};
pub use summary::{summarize_grid, Summary};
pub use error::{Error, Result};
