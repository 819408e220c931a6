//! CLI表示層
//!
//! 変換イベントを受け取り、進捗バーとファイル一覧（FileList）を更新する。
//! 表示用の状態を書き換えるのはこのモジュールだけ。

use crate::dispatcher::{BatchOutcome, BatchResult};
use indicatif::{ProgressBar, ProgressStyle};
use office_pdf_common::{format_size, FileList, ProgressEvent};

pub struct ConsolePresenter {
    bar: ProgressBar,
    list: FileList,
}

impl ConsolePresenter {
    pub fn new(list: FileList) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self::with_bar(list, bar)
    }

    pub fn with_bar(list: FileList, bar: ProgressBar) -> Self {
        Self { bar, list }
    }

    pub fn list(&self) -> &FileList {
        &self.list
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn handle(&mut self, event: &ProgressEvent) {
        self.list.apply(event);

        match event {
            ProgressEvent::FileStarted { name, document_type, percent, .. } => {
                self.bar.set_position(percent.round() as u64);
                self.bar.set_message(format!("変換 {}: {}", document_type, name));
            }
            ProgressEvent::FileCompleted { name, status, .. } => {
                self.bar.println(format!("  {} {}", status, name));
            }
            ProgressEvent::BatchCompleted { success_count, error_count } => {
                self.bar.set_position(100);
                self.bar.finish_with_message(format!(
                    "完了: {}件成功, {}件エラー",
                    success_count, error_count
                ));
            }
            ProgressEvent::ArchiveCompleted(summary) => {
                if summary.failed > 0 {
                    println!(
                        "⚠ {}件の旧PDFをアーカイブできませんでした ({})",
                        summary.failed,
                        summary.folder.display()
                    );
                }
            }
        }
    }
}

/// 検出結果の要約
pub fn discovery_summary(list: &FileList) -> String {
    if list.is_empty() {
        return "Word/Excelファイルが見つかりません".to_string();
    }
    let counts = list.counts();
    format!(
        "{}件のファイルを検出 - Word: {}, Excel: {}",
        counts.total(),
        counts.word,
        counts.spreadsheet
    )
}

pub fn print_file_list(list: &FileList) {
    for (i, record) in list.records().iter().enumerate() {
        let mark = if record.selected { "☑" } else { "☐" };
        println!(
            "{:>4} {} {:<6} {:<50} {:>10}  {}",
            i + 1,
            mark,
            record.document_type.label(),
            record.name,
            format_size(record.size_bytes),
            record.status
        );
    }
}

/// 一括変換の最終メッセージ
pub fn completion_message(result: &BatchResult) -> String {
    match result.outcome() {
        BatchOutcome::AllSucceeded => {
            let archived = result.archived_count();
            if archived > 0 {
                format!("すべてのファイルを変換しました\n{}件の旧PDFをアーカイブしました", archived)
            } else {
                "すべてのファイルを変換しました".to_string()
            }
        }
        BatchOutcome::CompletedWithErrors(n) => format!("{}件のエラーで変換を終了しました", n),
    }
}
