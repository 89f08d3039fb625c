//! PUE Collector
//!
//! 冷却・電源設備のレコード（JSON/CSV）をExcelファイルに追記し、
//! HTTPで取り込み・集計・ダウンロードを提供する。

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod server;
pub mod store;

pub use error::{CollectorError, Result};
pub use ingest::{ingest, IngestFormat, IngestOutcome};
pub use store::Store;
