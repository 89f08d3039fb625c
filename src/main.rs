use clap::Parser;
use pue_collector::{cli, config, ingest, server, store};
use cli::{Cli, Commands};
use config::Config;
use std::path::{Path, PathBuf};
use store::Store;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

/// ディレクトリ指定ならタイムスタンプ付きファイル名を付ける
fn export_target(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(store::export_file_name(&chrono::Local::now()))
    } else {
        output.to_path_buf()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;

    if let Commands::Config { set_excel_file, set_sheet_name, set_bind, show } = &cli.command {
        let changed = set_excel_file.is_some() || set_sheet_name.is_some() || set_bind.is_some();

        if let Some(path) = set_excel_file {
            config.excel_file = path.clone();
        }
        if let Some(sheet) = set_sheet_name {
            config.sheet_name = sheet.clone();
        }
        if let Some(bind) = set_bind {
            config.bind = bind.clone();
        }
        if changed {
            config.save()?;
            println!("✔ Einstellungen gespeichert: {}", Config::config_path()?.display());
        }

        if *show || !changed {
            println!("Einstellungen:");
            println!("  Excel-Datei: {}", config.excel_file.display());
            println!("  Tabellenblatt: {}", config.sheet_name);
            println!("  Adresse: {}", config.bind);
        }
        return Ok(());
    }

    // CLI指定は設定ファイル・環境変数より優先
    if let Some(path) = cli.excel_file {
        config.excel_file = path;
    }
    if let Some(sheet) = cli.sheet_name {
        config.sheet_name = sheet;
    }

    let store = Store::open(&config.excel_file, &config.sheet_name)?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind);
            println!("{}", "=".repeat(60));
            println!("PUE Datenbank Server gestartet!");
            println!("{}", "=".repeat(60));
            println!("  http://{}", bind);
            println!();
            println!("API Endpoints:");
            println!("  POST /api/add      - Daten hinzufügen");
            println!("  GET  /api/stats    - Statistiken abrufen");
            println!("  GET  /api/download - Excel herunterladen");
            println!("  POST /upload       - JSON/CSV hochladen");
            println!("{}", "=".repeat(60));
            server::serve(store, &bind).await?;
        }

        Commands::Add { input, format } => {
            let format = cli::resolve_format(&input, format);
            let data = std::fs::read_to_string(&input)?;

            let outcome = ingest::ingest(&store, Some(&data), &format.to_string());
            if !outcome.success {
                anyhow::bail!(outcome.message);
            }
            println!("{}", outcome.message);
        }

        Commands::Stats => {
            let summary = store.summarize()?;
            println!("=== Datenbank-Übersicht ===");
            println!("Gesamtanzahl: {}", summary.total_rows);
            println!("Hersteller: {}", summary.distinct_manufacturers);
            println!("Produktkategorien: {}", summary.distinct_categories);
            println!(
                "Letzte_Aktualisierung: {}",
                summary.last_timestamp.as_deref().unwrap_or("-")
            );
        }

        Commands::Export { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let target = export_target(&output);
            std::fs::copy(store.path(), &target)?;
            println!("✔ Excel exportiert: {}", target.display());
        }

        // 上で処理済み
        Commands::Config { .. } => {}
    }

    Ok(())
}
