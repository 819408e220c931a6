//! 選択状態
//!
//! スキャン結果を1つのリストで保持し、表示層はここから描画する。
//! ステータスの更新はパスをキーに行う（表示側の並び順に依存しない）。

use crate::error::{Error, Result};
use crate::event::ProgressEvent;
use crate::types::{DocumentType, FileRecord, FileStatus};
use std::path::Path;

/// 種別ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub word: usize,
    pub spreadsheet: usize,
}

impl TypeCounts {
    pub fn total(&self) -> usize {
        self.word + self.spreadsheet
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileList {
    records: Vec<FileRecord>,
}

impl FileList {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    /// 選択を反転し、新しい選択状態を返す
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        record.selected = !record.selected;
        Ok(record.selected)
    }

    pub fn toggle_path(&mut self, path: &Path) -> Result<bool> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.path == path)
            .ok_or_else(|| Error::UnknownPath(path.to_path_buf()))?;
        record.selected = !record.selected;
        Ok(record.selected)
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all(false);
    }

    pub fn invert(&mut self) {
        for record in &mut self.records {
            record.selected = !record.selected;
        }
    }

    fn set_all(&mut self, selected: bool) {
        for record in &mut self.records {
            record.selected = selected;
        }
    }

    /// 選択中のファイル（スキャン順）
    pub fn selected(&self) -> Vec<FileRecord> {
        self.records.iter().filter(|r| r.selected).cloned().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.records.iter().filter(|r| r.selected).count()
    }

    pub fn counts(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for record in &self.records {
            match record.document_type {
                DocumentType::Word => counts.word += 1,
                DocumentType::Spreadsheet => counts.spreadsheet += 1,
            }
        }
        counts
    }

    /// 変換イベントをステータスに反映（未知のパスは無視）
    pub fn apply(&mut self, event: &ProgressEvent) {
        let (path, status) = match event {
            ProgressEvent::FileStarted { path, .. } => (path, FileStatus::InProgress),
            ProgressEvent::FileCompleted { path, status, .. } => (path, *status),
            _ => return,
        };

        if let Some(record) = self.records.iter_mut().find(|r| &r.path == path) {
            record.status = status;
        }
    }
}
