//! 変換結果レポート（JSON）

use crate::dispatcher::BatchResult;
use crate::error::Result;
use office_pdf_common::FileRecord;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport<'a> {
    pub generated_at: String,
    pub root: &'a Path,
    pub success_count: usize,
    pub error_count: usize,
    pub archived_count: usize,
    pub files: &'a [FileRecord],
}

impl<'a> BatchReport<'a> {
    pub fn new(root: &'a Path, result: &'a BatchResult) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            root,
            success_count: result.success_count,
            error_count: result.error_count,
            archived_count: result.archived_count(),
            files: &result.records,
        }
    }
}

pub fn write_report(path: &Path, root: &Path, result: &BatchResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&BatchReport::new(root, result))?;
    std::fs::write(path, content)?;
    Ok(())
}
