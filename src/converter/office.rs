//! Officeオートメーション（Windows）
//!
//! PowerShell経由でWord/ExcelのCOMを操作する。スクリプト側でも try/finally で
//! アプリケーションを必ず Quit し、プロセス側は AutomationSession が後始末する。
//! パスは環境変数で渡す（引用符のエスケープを避けるため）。

use super::session::AutomationSession;
use super::{find_program, DocumentConverter};
use crate::error::{OfficePdfError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

const INPUT_VAR: &str = "OFFICE_PDF_INPUT";
const OUTPUT_VAR: &str = "OFFICE_PDF_OUTPUT";

/// 17 = wdFormatPDF
const WORD_SCRIPT: &str = r#"
$ErrorActionPreference = 'Stop'
$word = New-Object -ComObject Word.Application
try {
    $word.Visible = $false
    $word.DisplayAlerts = 0
    $doc = $word.Documents.Open($env:OFFICE_PDF_INPUT, $false, $true)
    try {
        $doc.SaveAs([ref]$env:OFFICE_PDF_OUTPUT, [ref]17)
    } finally {
        $doc.Close([ref]0)
    }
} finally {
    $word.Quit()
    [void][System.Runtime.InteropServices.Marshal]::ReleaseComObject($word)
}
"#;

/// ブック全体（全シート）を1つのPDFへ。印刷範囲は尊重（IgnorePrintAreas = false）
const EXCEL_SCRIPT: &str = r#"
$ErrorActionPreference = 'Stop'
$excel = New-Object -ComObject Excel.Application
try {
    $excel.Visible = $false
    $excel.DisplayAlerts = $false
    $excel.ScreenUpdating = $false
    $workbook = $excel.Workbooks.Open($env:OFFICE_PDF_INPUT, 0, $true)
    try {
        $workbook.ExportAsFixedFormat(0, $env:OFFICE_PDF_OUTPUT, 0, $true, $false, [Type]::Missing, [Type]::Missing, $false)
    } finally {
        $workbook.Close($false)
    }
} finally {
    $excel.ScreenUpdating = $true
    $excel.Quit()
    [void][System.Runtime.InteropServices.Marshal]::ReleaseComObject($excel)
}
"#;

/// PowerShell + COM で動く変換器の共通部分
struct OfficeAutomation {
    prog_id: &'static str,
    script: &'static str,
    powershell: Option<PathBuf>,
    timeout: Duration,
    registered: OnceLock<bool>,
}

impl OfficeAutomation {
    fn powershell(&self) -> Option<PathBuf> {
        find_program(self.powershell.as_deref(), &["powershell", "pwsh"])
    }

    fn is_available(&self) -> bool {
        if !cfg!(windows) {
            return false;
        }
        let Some(powershell) = self.powershell() else {
            return false;
        };
        *self
            .registered
            .get_or_init(|| com_class_registered(&powershell, self.prog_id))
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let powershell = self.powershell().ok_or_else(|| {
            OfficePdfError::ConversionFailure("PowerShellが見つかりません".into())
        })?;

        let mut command = Command::new(powershell);
        command
            .args(["-NoProfile", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-Command", self.script])
            .env(INPUT_VAR, input)
            .env(OUTPUT_VAR, output);

        AutomationSession::start(self.prog_id, command)?.finish(self.timeout)
    }
}

/// COMクラスが登録されているか（Officeがインストールされているか）
fn com_class_registered(powershell: &Path, prog_id: &str) -> bool {
    let script = format!("if (Test-Path 'Registry::HKEY_CLASSES_ROOT\\{}') {{ exit 0 }} else {{ exit 1 }}", prog_id);
    Command::new(powershell)
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub struct WordAutomation(OfficeAutomation);

impl WordAutomation {
    pub fn new(powershell: Option<PathBuf>, timeout: Duration) -> Self {
        Self(OfficeAutomation {
            prog_id: "Word.Application",
            script: WORD_SCRIPT,
            powershell,
            timeout,
            registered: OnceLock::new(),
        })
    }
}

impl DocumentConverter for WordAutomation {
    fn name(&self) -> &'static str {
        "Word (Office)"
    }

    fn is_available(&self) -> bool {
        self.0.is_available()
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.0.convert(input, output)
    }
}

pub struct ExcelAutomation(OfficeAutomation);

impl ExcelAutomation {
    pub fn new(powershell: Option<PathBuf>, timeout: Duration) -> Self {
        Self(OfficeAutomation {
            prog_id: "Excel.Application",
            script: EXCEL_SCRIPT,
            powershell,
            timeout,
            registered: OnceLock::new(),
        })
    }
}

impl DocumentConverter for ExcelAutomation {
    fn name(&self) -> &'static str {
        "Excel (Office)"
    }

    fn is_available(&self) -> bool {
        self.0.is_available()
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.0.convert(input, output)
    }
}
