//! 進捗通知
//!
//! 変換処理（バックグラウンド）から表示層への通知は、不変のイベントとして渡す。
//! 表示層がイベントを受け取って自分の状態を更新する。

use crate::types::{DocumentType, FileRecord, FileStatus};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// アーカイブ処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub folder: PathBuf,
    pub archived: usize,
    pub failed: usize,
}

/// 変換処理から表示層へのイベント
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    FileStarted {
        path: PathBuf,
        name: String,
        document_type: DocumentType,
        index: usize,
        total: usize,
        /// 処理開始前の進捗率（index / total * 100）
        percent: f64,
    },
    FileCompleted {
        path: PathBuf,
        name: String,
        status: FileStatus,
    },
    /// 全ファイル処理後（進捗100%）
    BatchCompleted {
        success_count: usize,
        error_count: usize,
    },
    ArchiveCompleted(ArchiveSummary),
}

impl ProgressEvent {
    pub fn file_started(record: &FileRecord, index: usize, total: usize, percent: f64) -> Self {
        ProgressEvent::FileStarted {
            path: record.path.clone(),
            name: record.name.clone(),
            document_type: record.document_type,
            index,
            total,
            percent,
        }
    }

    pub fn file_completed(record: &FileRecord) -> Self {
        ProgressEvent::FileCompleted {
            path: record.path.clone(),
            name: record.name.clone(),
            status: record.status,
        }
    }
}

/// 進捗の受け手
pub trait ProgressReporter {
    fn on_file_started(&mut self, record: &FileRecord, index: usize, total: usize, percent: f64);

    fn on_file_completed(&mut self, record: &FileRecord);

    fn on_batch_completed(&mut self, success_count: usize, error_count: usize);

    fn on_archive_completed(&mut self, _summary: &ArchiveSummary) {}
}

/// イベントをそのまま記録する（テスト・ログ用）
impl ProgressReporter for Vec<ProgressEvent> {
    fn on_file_started(&mut self, record: &FileRecord, index: usize, total: usize, percent: f64) {
        self.push(ProgressEvent::file_started(record, index, total, percent));
    }

    fn on_file_completed(&mut self, record: &FileRecord) {
        self.push(ProgressEvent::file_completed(record));
    }

    fn on_batch_completed(&mut self, success_count: usize, error_count: usize) {
        self.push(ProgressEvent::BatchCompleted { success_count, error_count });
    }

    fn on_archive_completed(&mut self, summary: &ArchiveSummary) {
        self.push(ProgressEvent::ArchiveCompleted(summary.clone()));
    }
}
