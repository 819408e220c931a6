//! office-pdf Common Library
//!
//! 変換エンジンと表示層（CLI/GUI）で共有される型と選択状態

pub mod types;
pub mod selection;
pub mod event;
pub mod error;

pub use types::{format_size, DocumentType, FileRecord, FileStatus};
pub use selection::{FileList, TypeCounts};
pub use event::{ArchiveSummary, ProgressEvent, ProgressReporter};
pub use error::{Error, Result};
