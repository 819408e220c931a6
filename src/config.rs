use crate::error::{OfficePdfError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Word変換のバックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordBackend {
    /// Officeオートメーション優先、なければLibreOffice
    #[default]
    Auto,
    Automation,
    LibreOffice,
}

impl std::str::FromStr for WordBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(WordBackend::Auto),
            "automation" | "office" | "com" => Ok(WordBackend::Automation),
            "libreoffice" | "soffice" => Ok(WordBackend::LibreOffice),
            _ => Err(format!("Unknown backend: {}. Use auto, automation, or libreoffice", s)),
        }
    }
}

impl std::fmt::Display for WordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordBackend::Auto => write!(f, "auto"),
            WordBackend::Automation => write!(f, "automation"),
            WordBackend::LibreOffice => write!(f, "libreoffice"),
        }
    }
}

/// 実行時設定（読み込みのみ。ツール側から書き込むことはない）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LibreOffice (soffice) の実行ファイル。未指定ならPATHから検索
    pub soffice_path: Option<PathBuf>,
    /// PowerShellの実行ファイル。未指定ならPATHから検索
    pub powershell_path: Option<PathBuf>,
    /// 1ファイルあたりの変換タイムアウト
    pub timeout_seconds: u64,
    pub word_backend: WordBackend,
    /// サブフォルダも含めるか（デフォルト）
    pub recursive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// ホームディレクトリがなければ設定ファイルは読まず、デフォルト + 環境変数で動く
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok();
        Self::load_from(config_path.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(config_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default_config(),
        };

        // 環境変数を優先
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OfficePdfError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("office-pdf").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            soffice_path: None,
            powershell_path: None,
            timeout_seconds: 300,
            word_backend: WordBackend::Auto,
            recursive: true,
        }
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("OFFICE_PDF_SOFFICE") {
            self.soffice_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("OFFICE_PDF_POWERSHELL") {
            self.powershell_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("OFFICE_PDF_TIMEOUT") {
            self.timeout_seconds = value.trim().parse().map_err(|_| {
                OfficePdfError::Config(format!("OFFICE_PDF_TIMEOUT が不正です: {}", value))
            })?;
        }
        if let Some(value) = lookup("OFFICE_PDF_WORD_BACKEND") {
            self.word_backend = value.parse().map_err(OfficePdfError::Config)?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}
