use office_pdf_common::DocumentType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfficePdfError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("フォルダの読み込みに失敗: {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Word/Excelファイルが見つかりません: {0}")]
    NoDocumentsFound(String),

    #[error("ファイルが選択されていません")]
    NoSelection,

    #[error("{0}の変換モジュールが利用できません")]
    NoConverterAvailable(DocumentType),

    #[error("変換エラー: {0}")]
    ConversionFailure(String),

    #[error("旧PDFのリネームに失敗: {}: {source}", .path.display())]
    Rotation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("旧PDFのアーカイブに失敗: {}: {source}", .path.display())]
    Archival {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("選択エラー: {0}")]
    Selection(#[from] office_pdf_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("バックグラウンド処理エラー: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, OfficePdfError>;
