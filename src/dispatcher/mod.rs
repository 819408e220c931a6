//! 一括変換
//!
//! 選択されたファイルをスキャン順に1件ずつ変換する。
//! 1. 既存のPDFがあれば `<ステム>_ancien.pdf` にリネーム（失敗しても変換は続行）
//! 2. 文書種別に応じた変換器で変換
//! 3. 全件終了後、リネームした旧PDFをアーカイブ
//!
//! 1件の失敗でバッチを止めない。結果は成功件数・エラー件数の集計のみ。

mod rotation;

pub use rotation::{rotate_existing, rotated_path, ROTATION_SUFFIX};

use crate::archive;
use crate::converter::Converters;
use crate::error::{OfficePdfError, Result};
use office_pdf_common::{ArchiveSummary, FileRecord, FileStatus, ProgressEvent, ProgressReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// バッチ全体の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    CompletedWithErrors(usize),
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    /// 最終ステータス付きのレコード（処理順）
    pub records: Vec<FileRecord>,
    pub success_count: usize,
    pub error_count: usize,
    /// リネームした旧PDF
    pub rotated: Vec<PathBuf>,
    pub archive: Option<ArchiveSummary>,
}

impl BatchResult {
    pub fn outcome(&self) -> BatchOutcome {
        if self.error_count == 0 {
            BatchOutcome::AllSucceeded
        } else {
            BatchOutcome::CompletedWithErrors(self.error_count)
        }
    }

    pub fn archived_count(&self) -> usize {
        self.archive.as_ref().map(|a| a.archived).unwrap_or(0)
    }
}

/// 一括変換（呼び出したスレッドで同期実行）
pub fn run_batch<R>(
    mut records: Vec<FileRecord>,
    converters: &Converters,
    root: &Path,
    reporter: &mut R,
) -> BatchResult
where
    R: ProgressReporter + ?Sized,
{
    let total = records.len();
    let mut success_count = 0;
    let mut error_count = 0;
    let mut rotated = Vec::new();

    info!(total, root = %root.display(), "一括変換開始");

    for (index, record) in records.iter_mut().enumerate() {
        record.status = FileStatus::InProgress;
        let percent = index as f64 / total as f64 * 100.0;
        reporter.on_file_started(record, index, total, percent);

        match convert_one(record, converters, &mut rotated) {
            Ok(converter) => {
                record.status = FileStatus::Succeeded;
                success_count += 1;
                info!(file = %record.name, converter, "変換完了");
            }
            Err(err) => {
                record.status = FileStatus::Failed;
                error_count += 1;
                error!(file = %record.name, error = %err, "変換エラー");
            }
        }

        reporter.on_file_completed(record);
    }

    reporter.on_batch_completed(success_count, error_count);

    let rotated = exclude_fresh_outputs(rotated, &records);
    let archive = if rotated.is_empty() {
        None
    } else {
        let summary = archive::archive_old_pdfs(root, &rotated);
        reporter.on_archive_completed(&summary);
        Some(summary)
    };

    info!(success_count, error_count, "一括変換終了");

    BatchResult {
        records,
        success_count,
        error_count,
        rotated,
        archive,
    }
}

fn convert_one(
    record: &FileRecord,
    converters: &Converters,
    rotated: &mut Vec<PathBuf>,
) -> Result<&'static str> {
    let output = record.output_path();

    // リネーム失敗は致命的ではない（変換は続行し、既存PDFは上書きされうる）
    match rotate_existing(&output) {
        Ok(Some(old_pdf)) => rotated.push(old_pdf),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "旧PDFを退避できないまま変換します"),
    }

    converters.convert(record.document_type, &record.path, &output)
}

/// 今回の変換で作られたPDFはアーカイブしない
///
/// `report_ancien.docx` のように元ファイルのステムが `_ancien` で終わると、
/// 別ファイルの退避先と今回の出力先が同じパスになる。
fn exclude_fresh_outputs(rotated: Vec<PathBuf>, records: &[FileRecord]) -> Vec<PathBuf> {
    let fresh: Vec<PathBuf> = records
        .iter()
        .filter(|r| r.status == FileStatus::Succeeded)
        .map(FileRecord::output_path)
        .collect();

    rotated
        .into_iter()
        .filter(|path| {
            let is_fresh = fresh.contains(path);
            if is_fresh {
                warn!(path = %path.display(), "今回の変換結果と同じパスのためアーカイブしません");
            }
            !is_fresh
        })
        .collect()
}

/// イベントをチャネルへ送る
struct ChannelReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelReporter {
    fn send(&self, event: ProgressEvent) {
        // 受け手が先に終了していても変換は最後まで続ける
        let _ = self.tx.send(event);
    }
}

impl ProgressReporter for ChannelReporter {
    fn on_file_started(&mut self, record: &FileRecord, index: usize, total: usize, percent: f64) {
        self.send(ProgressEvent::file_started(record, index, total, percent));
    }

    fn on_file_completed(&mut self, record: &FileRecord) {
        self.send(ProgressEvent::file_completed(record));
    }

    fn on_batch_completed(&mut self, success_count: usize, error_count: usize) {
        self.send(ProgressEvent::BatchCompleted { success_count, error_count });
    }

    fn on_archive_completed(&mut self, summary: &ArchiveSummary) {
        self.send(ProgressEvent::ArchiveCompleted(summary.clone()));
    }
}

/// バックグラウンドで実行中のバッチ
pub struct BatchHandle {
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    task: JoinHandle<BatchResult>,
}

impl BatchHandle {
    pub async fn join(self) -> Result<BatchResult> {
        self.task
            .await
            .map_err(|e| OfficePdfError::Task(e.to_string()))
    }
}

/// 一括変換をブロッキングタスクで開始する
///
/// 呼び出し側は `events` からイベントを受け取って表示を更新し、最後に `join` する。
pub fn spawn_batch(records: Vec<FileRecord>, converters: Arc<Converters>, root: PathBuf) -> BatchHandle {
    let (tx, events) = mpsc::unbounded_channel();

    let task = tokio::task::spawn_blocking(move || {
        let mut reporter = ChannelReporter { tx };
        run_batch(records, &converters, &root, &mut reporter)
    });

    BatchHandle { events, task }
}
