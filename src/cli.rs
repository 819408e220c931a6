use crate::config::WordBackend;
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use office_pdf_common::{Error as SelectionError, FileList};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "office-pdf")]
#[command(about = "Word/Excel文書をPDFへ一括変換（旧PDFは pdf_archive へ退避）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Word変換のバックエンド (auto/automation/libreoffice)
    #[arg(long, global = true)]
    pub word_backend: Option<WordBackend>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内のWord/Excelファイルを一覧表示
    List {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// 選択したファイルをPDFに変換
    Convert {
        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// 結果をJSONで保存
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 設定を表示
    Config {
        /// 設定と変換モジュールの利用可否を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// 対象フォルダのパス
    #[arg(required = true)]
    pub folder: PathBuf,

    /// サブフォルダも再帰的にスキャン
    #[arg(short = 'r', long, conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// 直下のファイルのみ
    #[arg(long)]
    pub no_recursive: bool,
}

impl ScanArgs {
    /// フラグがなければ設定値を使う
    pub fn recursive_or(&self, default: bool) -> bool {
        if self.no_recursive {
            false
        } else if self.recursive {
            true
        } else {
            default
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// すべて選択
    #[arg(short, long)]
    pub all: bool,

    /// 番号で選択を切り替え（`list` の番号、複数指定可）
    #[arg(short, long, num_args = 1..)]
    pub pick: Vec<usize>,

    /// 選択を反転
    #[arg(long)]
    pub invert: bool,

    /// 対話的に選択
    #[arg(short, long)]
    pub interactive: bool,
}

impl SelectionArgs {
    /// `--all` → `--pick` → `--invert` の順に適用
    pub fn apply(&self, list: &mut FileList) -> Result<()> {
        if self.all {
            list.select_all();
        }

        for &number in &self.pick {
            let index = number.checked_sub(1).ok_or(SelectionError::IndexOutOfRange {
                index: number,
                len: list.len(),
            })?;
            list.toggle(index)?;
        }

        if self.invert {
            list.invert();
        }
        Ok(())
    }
}
