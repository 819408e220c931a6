//! 既存PDFの退避（`<ステム>_ancien.pdf` へのリネーム）

use crate::error::{OfficePdfError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ROTATION_SUFFIX: &str = "_ancien";

pub fn rotated_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output.with_file_name(format!("{}{}.pdf", stem, ROTATION_SUFFIX))
}

/// 出力先にPDFがあればリネームし、その新しいパスを返す
///
/// 同名の `_ancien.pdf` が既にあれば先に削除する（後勝ち）。
pub fn rotate_existing(output: &Path) -> Result<Option<PathBuf>> {
    if !output.exists() {
        return Ok(None);
    }

    let rotated = rotated_path(output);
    if rotated.exists() {
        fs::remove_file(&rotated).map_err(|source| OfficePdfError::Rotation {
            path: rotated.clone(),
            source,
        })?;
    }

    fs::rename(output, &rotated).map_err(|source| OfficePdfError::Rotation {
        path: output.to_path_buf(),
        source,
    })?;

    debug!(from = %output.display(), to = %rotated.display(), "旧PDFをリネーム");
    Ok(Some(rotated))
}
