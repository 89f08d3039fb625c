use crate::error::{CollectorError, Result};
use pue_common::schema::{DEFAULT_EXCEL_FILE, DEFAULT_SHEET_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub excel_file: PathBuf,
    pub sheet_name: String,
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excel_file: PathBuf::from(DEFAULT_EXCEL_FILE),
            sheet_name: DEFAULT_SHEET_NAME.into(),
            bind: DEFAULT_BIND.into(),
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順で読み込む
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CollectorError::Config("Home-Verzeichnis nicht gefunden".into()))?;
        Ok(home.join(".config").join("pue-collector").join("config.json"))
    }

    /// PUE_EXCEL_FILE / PUE_SHEET_NAME / PUE_BIND で上書き
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("PUE_EXCEL_FILE").filter(|v| !v.is_empty()) {
            self.excel_file = PathBuf::from(path);
        }
        if let Some(sheet) = lookup("PUE_SHEET_NAME").filter(|v| !v.is_empty()) {
            self.sheet_name = sheet;
        }
        if let Some(bind) = lookup("PUE_BIND").filter(|v| !v.is_empty()) {
            self.bind = bind;
        }
        self
    }
}
