//! Word/Excel文書のPDF一括変換
//!
//! - scanner: 変換対象ファイルの検出
//! - converter: 文書種別ごとの外部変換（Officeオートメーション / LibreOffice）
//! - dispatcher: 一括変換（旧PDFのリネームを含む）
//! - archive: 旧PDFを pdf_archive フォルダへ移動

pub mod archive;
pub mod cli;
pub mod config;
pub mod converter;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod report;
pub mod scanner;

pub use office_pdf_common as common;
