//! 一括変換の統合テスト
//!
//! 実際のOfficeは使わず、PDFの代わりにマーカーを書き出す変換器で検証する

use office_pdf::converter::{Converters, DocumentConverter};
use office_pdf::dispatcher::{self, BatchOutcome};
use office_pdf::error::{OfficePdfError, Result};
use office_pdf_common::{DocumentType, FileList, FileRecord, FileStatus, ProgressEvent};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// 入力ファイル名入りのマーカーを書き出す。名前に "broken" を含むファイルは失敗する
struct MarkerConverter {
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MarkerConverter {
    fn new() -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl DocumentConverter for MarkerConverter {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let name = input.file_name().unwrap().to_string_lossy().to_string();
        let result = if name.contains("broken") {
            Err(OfficePdfError::ConversionFailure(format!("壊れた文書: {}", name)))
        } else {
            fs::write(output, format!("%PDF new {}", name)).map_err(OfficePdfError::from)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn marker_converters() -> Converters {
    Converters::new()
        .with(DocumentType::Word, MarkerConverter::new())
        .with(DocumentType::Spreadsheet, MarkerConverter::new())
}

fn record(path: &Path) -> FileRecord {
    fs::write(path, b"source").unwrap();
    let size = fs::metadata(path).unwrap().len();
    let mut record = FileRecord::new(path.to_path_buf(), size).unwrap();
    record.selected = true;
    record
}

/// 既存PDF → _ancien にリネーム → 変換 → pdf_archive へ移動
#[test]
fn test_rotation_then_archive_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    fs::write(root.join("report.pdf"), b"%PDF original").unwrap();
    let records = vec![record(&root.join("report.docx"))];

    let mut events: Vec<ProgressEvent> = Vec::new();
    let result = dispatcher::run_batch(records, &marker_converters(), root, &mut events);

    assert_eq!(result.outcome(), BatchOutcome::AllSucceeded);
    assert_eq!(fs::read_to_string(root.join("report.pdf")).unwrap(), "%PDF new report.docx");
    assert!(!root.join("report_ancien.pdf").exists());
    assert_eq!(
        fs::read(root.join("pdf_archive/report_ancien.pdf")).unwrap(),
        b"%PDF original"
    );
    assert_eq!(result.archived_count(), 1);
    assert!(matches!(events.last(), Some(ProgressEvent::ArchiveCompleted(s)) if s.archived == 1));
}

/// report.pdf と report_ancien.pdf が両方ある場合、古い _ancien は置き換えられる
#[test]
fn test_rotation_collision_replaces_stale_copy() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    fs::write(root.join("report.pdf"), b"%PDF v2").unwrap();
    fs::write(root.join("report_ancien.pdf"), b"%PDF v1").unwrap();
    let records = vec![record(&root.join("report.docx"))];

    let result = dispatcher::run_batch(records, &marker_converters(), root, &mut Vec::<ProgressEvent>::new());

    assert_eq!(result.success_count, 1);
    assert!(!root.join("report_ancien.pdf").exists());
    let archive = root.join("pdf_archive");
    assert_eq!(fs::read(archive.join("report_ancien.pdf")).unwrap(), b"%PDF v2");
    assert_eq!(fs::read_dir(&archive).unwrap().count(), 1);
}

/// ステムが _ancien で終わる元ファイルの出力はアーカイブに移されない
#[test]
fn test_fresh_output_named_like_rotation_stays_in_place() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    fs::write(root.join("report.pdf"), b"%PDF report old").unwrap();
    fs::write(root.join("report_ancien.pdf"), b"%PDF report_ancien old").unwrap();
    let records = vec![
        record(&root.join("report.docx")),
        record(&root.join("report_ancien.docx")),
    ];

    let result = dispatcher::run_batch(records, &marker_converters(), root, &mut Vec::<ProgressEvent>::new());

    assert_eq!(result.success_count, 2);
    assert_eq!(fs::read_to_string(root.join("report.pdf")).unwrap(), "%PDF new report.docx");
    assert_eq!(
        fs::read_to_string(root.join("report_ancien.pdf")).unwrap(),
        "%PDF new report_ancien.docx"
    );

    let archive = root.join("pdf_archive");
    assert!(!archive.join("report_ancien.pdf").exists());
    assert_eq!(
        fs::read(archive.join("report_ancien_ancien.pdf")).unwrap(),
        b"%PDF report old"
    );
    assert_eq!(result.archived_count(), 1);
    assert!(!result.rotated.contains(&root.join("report_ancien.pdf")));
}

/// 2件目が失敗しても残りは変換される
#[test]
fn test_partial_failure_does_not_abort() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    let records = vec![
        record(&root.join("a.docx")),
        record(&root.join("b_broken.docx")),
        record(&root.join("c.xlsx")),
    ];

    let result = dispatcher::run_batch(records, &marker_converters(), root, &mut Vec::<ProgressEvent>::new());

    assert_eq!(result.success_count, 2);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.outcome(), BatchOutcome::CompletedWithErrors(1));
    let statuses: Vec<_> = result.records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![FileStatus::Succeeded, FileStatus::Failed, FileStatus::Succeeded]
    );
    assert!(root.join("a.pdf").exists());
    assert!(!root.join("b_broken.pdf").exists());
    assert!(root.join("c.pdf").exists());
    // 旧PDFがなければアーカイブフォルダは作らない
    assert!(result.archive.is_none());
    assert!(!root.join("pdf_archive").exists());
}

/// 変換器がない文書種別はそのファイルだけ失敗
#[test]
fn test_missing_converter_fails_only_that_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    let records = vec![
        record(&root.join("a.docx")),
        record(&root.join("b.xlsx")),
        record(&root.join("c.doc")),
    ];
    let converters = Converters::new().with(DocumentType::Word, MarkerConverter::new());

    let result = dispatcher::run_batch(records, &converters, root, &mut Vec::<ProgressEvent>::new());

    assert_eq!(result.success_count, 2);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.records[1].status, FileStatus::Failed);
}

/// 旧PDFを退避できなくても変換は続行する（既存PDFは上書き）
#[test]
fn test_rotation_failure_is_not_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    fs::write(root.join("report.pdf"), b"%PDF original").unwrap();
    fs::create_dir(root.join("report_ancien.pdf")).unwrap();
    let records = vec![record(&root.join("report.docx"))];

    let result = dispatcher::run_batch(records, &marker_converters(), root, &mut Vec::<ProgressEvent>::new());

    assert_eq!(result.success_count, 1);
    assert!(result.rotated.is_empty());
    assert_eq!(fs::read_to_string(root.join("report.pdf")).unwrap(), "%PDF new report.docx");
}

/// 進捗は処理前に index / total * 100、ファイルごとに開始→完了の順
#[test]
fn test_progress_events_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    let records = vec![
        record(&root.join("a.docx")),
        record(&root.join("b.xls")),
        record(&root.join("c_broken.docm.docx")),
        record(&root.join("d.xlsm")),
    ];

    let mut events: Vec<ProgressEvent> = Vec::new();
    dispatcher::run_batch(records, &marker_converters(), root, &mut events);

    let percents: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::FileStarted { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![0.0, 25.0, 50.0, 75.0]);

    // 開始と完了が交互に並ぶ
    for pair in events[..8].chunks(2) {
        match (&pair[0], &pair[1]) {
            (
                ProgressEvent::FileStarted { path: started, .. },
                ProgressEvent::FileCompleted { path: completed, status, .. },
            ) => {
                assert_eq!(started, completed);
                assert!(status.is_terminal());
            }
            other => panic!("順序が不正: {:?}", other),
        }
    }
    assert_eq!(
        events[8],
        ProgressEvent::BatchCompleted { success_count: 3, error_count: 1 }
    );
    assert_eq!(events.len(), 9);
}

/// 変換器は同時に1つしか呼ばれない
#[test]
fn test_converter_calls_are_sequential() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    let records: Vec<_> = (0..5).map(|i| record(&root.join(format!("{}.docx", i)))).collect();

    let converter = MarkerConverter::new();
    let max_in_flight = converter.max_in_flight.clone();
    let converters = Converters::new().with(DocumentType::Word, converter);

    dispatcher::run_batch(records, &converters, root, &mut Vec::<ProgressEvent>::new());
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
}

/// 空のバッチ
#[test]
fn test_empty_batch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut events: Vec<ProgressEvent> = Vec::new();

    let result = dispatcher::run_batch(Vec::new(), &marker_converters(), dir.path(), &mut events);

    assert_eq!(result.outcome(), BatchOutcome::AllSucceeded);
    assert_eq!(
        events,
        vec![ProgressEvent::BatchCompleted { success_count: 0, error_count: 0 }]
    );
}

/// バックグラウンド実行: イベントはチャネル経由で届き、表示側の一覧に反映できる
#[tokio::test]
async fn test_spawn_batch_streams_events() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path().to_path_buf();
    fs::write(root.join("b_broken.pdf"), b"%PDF old").unwrap();
    let records = vec![record(&root.join("a.docx")), record(&root.join("b_broken.xlsx"))];
    let mut view = FileList::new(records.clone());

    let mut handle = dispatcher::spawn_batch(records, Arc::new(marker_converters()), root.clone());

    let mut received = 0;
    while let Some(event) = handle.events.recv().await {
        view.apply(&event);
        received += 1;
    }
    let result = handle.join().await.unwrap();

    assert_eq!(received, 6);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.error_count, 1);
    assert_eq!(view.records()[0].status, FileStatus::Succeeded);
    assert_eq!(view.records()[1].status, FileStatus::Failed);
    // 変換に失敗しても旧PDFはアーカイブされる
    assert!(root.join("pdf_archive/b_broken_ancien.pdf").exists());
    assert!(!root.join("b_broken.pdf").exists());
}
