//! 変換対象ファイルのスキャン
//!
//! フォルダ内（オプションでサブフォルダも）のWord/Excelファイルを検出する。
//! 読み込みエラーが1件でもあればスキャン全体を失敗とし、途中結果は返さない。

use crate::error::{OfficePdfError, Result};
use office_pdf_common::{DocumentType, FileRecord};
use std::io;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub fn discover(root: &Path, recursive: bool) -> Result<Vec<FileRecord>> {
    if !root.exists() {
        return Err(OfficePdfError::FolderNotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(OfficePdfError::Discovery {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "ディレクトリではありません"),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut records = Vec::new();

    // ファイル名順で列挙（同じツリーなら毎回同じ順序）
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| OfficePdfError::Discovery {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: io::Error::from(e),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if DocumentType::from_path(path).is_none() {
            continue;
        }

        let metadata = std::fs::metadata(path).map_err(|source| OfficePdfError::Discovery {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(record) = FileRecord::new(absolute(path)?, metadata.len()) {
            debug!(path = %record.path.display(), kind = %record.document_type, "検出");
            records.push(record);
        }
    }

    info!(root = %root.display(), recursive, count = records.len(), "スキャン完了");
    Ok(records)
}

fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
