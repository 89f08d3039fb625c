use clap::{Parser, Subcommand};
use crate::ingest::IngestFormat;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pue-collector")]
#[command(about = "PUE Datenbank: JSON/CSV-Gerätedaten in eine Excel-Datei übernehmen", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Excelファイル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub excel_file: Option<PathBuf>,

    /// シート名（設定ファイルより優先）
    #[arg(long, global = true)]
    pub sheet_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバーを起動
    Serve {
        /// 待ち受けアドレス（例: 0.0.0.0:5000）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// JSON/CSVファイルを取り込む
    Add {
        /// 入力ファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 入力形式 (json/csv)。省略時は拡張子から判定
        #[arg(short, long)]
        format: Option<InputFormatArg>,
    },

    /// 集計を表示
    Stats,

    /// Excelファイルをタイムスタンプ付きでコピー
    Export {
        /// 出力先ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// Excelファイルを設定
        #[arg(long)]
        set_excel_file: Option<PathBuf>,

        /// シート名を設定
        #[arg(long)]
        set_sheet_name: Option<String>,

        /// 待ち受けアドレスを設定
        #[arg(long)]
        set_bind: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// clap用の入力形式
#[derive(Clone, Copy, Debug)]
pub struct InputFormatArg(pub IngestFormat);

impl std::str::FromStr for InputFormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .to_ascii_lowercase()
            .parse::<IngestFormat>()
            .map(InputFormatArg)
            .map_err(|_| format!("Unknown format: {}. Use json or csv", s))
    }
}

/// 明示指定がなければ拡張子から判定（不明ならJSON）
pub fn resolve_format(input: &Path, explicit: Option<InputFormatArg>) -> IngestFormat {
    if let Some(InputFormatArg(format)) = explicit {
        return format;
    }
    match input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => IngestFormat::Csv,
        _ => IngestFormat::Json,
    }
}
