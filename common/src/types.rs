//! 変換対象ファイルの型定義
//!
//! 変換エンジンと表示層で共有される型:
//! - DocumentType: 拡張子から決まる文書種別（Word/Excel）
//! - FileStatus: 変換ステータス
//! - FileRecord: スキャンで検出した1ファイル分の情報

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 対応する拡張子と文書種別（小文字で比較）
const EXTENSION_TABLE: &[(&str, DocumentType)] = &[
    ("docx", DocumentType::Word),
    ("doc", DocumentType::Word),
    ("xlsx", DocumentType::Spreadsheet),
    ("xls", DocumentType::Spreadsheet),
    ("xlsm", DocumentType::Spreadsheet),
];

/// 文書種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Word,
    Spreadsheet,
}

impl DocumentType {
    /// 拡張子から文書種別を判定（大文字小文字を区別しない）
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_TABLE
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, t)| *t)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Word => "Word",
            DocumentType::Spreadsheet => "Excel",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 変換ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileStatus {
    #[default]
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl FileStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Succeeded | FileStatus::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Pending => "待機中",
            FileStatus::InProgress => "変換中...",
            FileStatus::Succeeded => "✓ 完了",
            FileStatus::Failed => "✗ エラー",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// スキャンで検出したファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// 絶対パス（一意キー）
    pub path: PathBuf,
    pub name: String,
    pub document_type: DocumentType,
    /// スキャン時点のサイズ（再取得しない）
    pub size_bytes: u64,
    pub selected: bool,
    pub status: FileStatus,
}

impl FileRecord {
    /// 対応拡張子でなければ None
    pub fn new(path: PathBuf, size_bytes: u64) -> Option<Self> {
        let document_type = DocumentType::from_path(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Some(Self {
            path,
            name,
            document_type,
            size_bytes,
            selected: false,
            status: FileStatus::Pending,
        })
    }

    /// 出力PDFのパス（同じフォルダ・同じステム）
    pub fn output_path(&self) -> PathBuf {
        self.path.with_extension("pdf")
    }
}

/// ファイルサイズを読みやすい形式に変換
pub fn format_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if size_bytes < KB {
        format!("{} B", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    }
}
