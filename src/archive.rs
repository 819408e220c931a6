//! 旧PDFのアーカイブ
//!
//! 一括変換の後、`_ancien` にリネームされた旧PDFを `<スキャン元>/pdf_archive/` へ移動する。
//! 個別の失敗はログに残して続行し、呼び出し元へは返さない。

use crate::error::{OfficePdfError, Result};
use office_pdf_common::ArchiveSummary;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const ARCHIVE_DIR_NAME: &str = "pdf_archive";

pub fn archive_dir(root: &Path) -> PathBuf {
    root.join(ARCHIVE_DIR_NAME)
}

pub fn archive_old_pdfs(root: &Path, old_pdfs: &[PathBuf]) -> ArchiveSummary {
    let folder = archive_dir(root);
    let mut summary = ArchiveSummary {
        folder: folder.clone(),
        ..Default::default()
    };

    if let Err(source) = fs::create_dir_all(&folder) {
        let err = OfficePdfError::Archival { path: folder, source };
        warn!(error = %err, "アーカイブフォルダを作成できません");
        summary.failed = old_pdfs.len();
        return summary;
    }

    for old_pdf in old_pdfs {
        if !old_pdf.exists() {
            debug!(path = %old_pdf.display(), "既に存在しないためスキップ");
            continue;
        }

        match move_into(old_pdf, &summary.folder) {
            Ok(dest) => {
                debug!(from = %old_pdf.display(), to = %dest.display(), "アーカイブ");
                summary.archived += 1;
            }
            Err(err) => {
                warn!(error = %err, "アーカイブに失敗");
                summary.failed += 1;
            }
        }
    }

    info!(
        folder = %summary.folder.display(),
        archived = summary.archived,
        failed = summary.failed,
        "旧PDFのアーカイブ完了"
    );
    summary
}

/// 同名ファイルがアーカイブにあれば削除してから移動（後勝ち）
fn move_into(old_pdf: &Path, folder: &Path) -> Result<PathBuf> {
    let archival = |path: &Path, source: io::Error| OfficePdfError::Archival {
        path: path.to_path_buf(),
        source,
    };

    let file_name = old_pdf.file_name().ok_or_else(|| {
        archival(old_pdf, io::Error::new(io::ErrorKind::InvalidInput, "ファイル名がありません"))
    })?;
    let dest = folder.join(file_name);

    // アーカイブフォルダ内の文書から生じた旧PDFは既に移動先にある
    if old_pdf.parent().is_some_and(|parent| same_dir(parent, folder)) {
        return Ok(dest);
    }

    if dest.exists() {
        fs::remove_file(&dest).map_err(|e| archival(&dest, e))?;
    }

    if let Err(rename_err) = fs::rename(old_pdf, &dest) {
        // 別デバイス間などでリネームできない場合はコピーして削除
        debug!(error = %rename_err, "リネーム不可、コピーで移動");
        fs::copy(old_pdf, &dest).map_err(|e| archival(old_pdf, e))?;
        fs::remove_file(old_pdf).map_err(|e| archival(old_pdf, e))?;
    }

    Ok(dest)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
