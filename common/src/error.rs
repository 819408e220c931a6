//! エラー型定義

use std::path::PathBuf;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Index out of range: {index} (files: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown file: {}", .0.display())]
    UnknownPath(PathBuf),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
