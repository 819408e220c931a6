//! 外部変換モジュール
//!
//! 文書種別ごとに変換器を優先順で登録し、利用可能な最初の変換器を使う。
//! - Word: Officeオートメーション → LibreOffice（オートメーションが無い場合のみ）
//! - Excel: Officeオートメーションのみ

mod libreoffice;
mod office;
mod session;

pub use libreoffice::LibreOfficeConverter;
pub use office::{ExcelAutomation, WordAutomation};
pub use session::AutomationSession;

use crate::config::{Config, WordBackend};
use crate::error::{OfficePdfError, Result};
use office_pdf_common::DocumentType;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 1つの変換手段
///
/// `convert` は変換が完全に終わる（外部プロセスの終了を含む）まで戻らない。
pub trait DocumentConverter: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// 文書種別 → 変換器（優先順）
#[derive(Default)]
pub struct Converters {
    word: Vec<Box<dyn DocumentConverter>>,
    spreadsheet: Vec<Box<dyn DocumentConverter>>,
}

impl Converters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut converters = Self::new();
        let timeout = config.timeout();
        let powershell = config.powershell_path.clone();

        match config.word_backend {
            WordBackend::Auto => {
                converters.register(DocumentType::Word, WordAutomation::new(powershell.clone(), timeout));
                converters.register(
                    DocumentType::Word,
                    LibreOfficeConverter::new(config.soffice_path.clone(), timeout),
                );
            }
            WordBackend::Automation => {
                converters.register(DocumentType::Word, WordAutomation::new(powershell.clone(), timeout));
            }
            WordBackend::LibreOffice => {
                converters.register(
                    DocumentType::Word,
                    LibreOfficeConverter::new(config.soffice_path.clone(), timeout),
                );
            }
        }

        converters.register(DocumentType::Spreadsheet, ExcelAutomation::new(powershell, timeout));
        converters
    }

    /// 末尾（最も優先度が低い位置）に追加
    pub fn register<C>(&mut self, document_type: DocumentType, converter: C) -> &mut Self
    where
        C: DocumentConverter + 'static,
    {
        self.slot_mut(document_type).push(Box::new(converter));
        self
    }

    pub fn with<C>(mut self, document_type: DocumentType, converter: C) -> Self
    where
        C: DocumentConverter + 'static,
    {
        self.register(document_type, converter);
        self
    }

    fn slot(&self, document_type: DocumentType) -> &[Box<dyn DocumentConverter>] {
        match document_type {
            DocumentType::Word => &self.word,
            DocumentType::Spreadsheet => &self.spreadsheet,
        }
    }

    fn slot_mut(&mut self, document_type: DocumentType) -> &mut Vec<Box<dyn DocumentConverter>> {
        match document_type {
            DocumentType::Word => &mut self.word,
            DocumentType::Spreadsheet => &mut self.spreadsheet,
        }
    }

    /// 利用可能な最初の変換器
    pub fn select(&self, document_type: DocumentType) -> Option<&dyn DocumentConverter> {
        self.slot(document_type)
            .iter()
            .find(|c| c.is_available())
            .map(|c| &**c)
    }

    /// 変換を実行し、使った変換器の名前を返す
    pub fn convert(&self, document_type: DocumentType, input: &Path, output: &Path) -> Result<&'static str> {
        let converter = self
            .select(document_type)
            .ok_or(OfficePdfError::NoConverterAvailable(document_type))?;

        debug!(converter = converter.name(), input = %input.display(), "変換開始");
        converter.convert(input, output)?;
        Ok(converter.name())
    }

    /// 登録済み変換器と利用可否（設定表示用）
    pub fn availability(&self) -> Vec<(DocumentType, &'static str, bool)> {
        [DocumentType::Word, DocumentType::Spreadsheet]
            .into_iter()
            .flat_map(|t| {
                self.slot(t)
                    .iter()
                    .map(move |c| (t, c.name(), c.is_available()))
            })
            .collect()
    }
}

/// 実行ファイルを探す（明示パス優先、なければPATHから）
pub fn find_program(configured: Option<&Path>, candidates: &[&str]) -> Option<PathBuf> {
    if let Some(path) = configured {
        return path.is_file().then(|| path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        for name in candidates {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
            if cfg!(windows) {
                let exe = candidate.with_extension("exe");
                if exe.is_file() {
                    return Some(exe);
                }
            }
        }
    }
    None
}
