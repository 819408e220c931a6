//! LibreOffice（headless）によるWord変換
//!
//! Officeオートメーションが使えない環境での代替。Excelには使わない。

use super::session::AutomationSession;
use super::{find_program, DocumentConverter};
use crate::error::{OfficePdfError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

pub struct LibreOfficeConverter {
    soffice: Option<PathBuf>,
    timeout: Duration,
}

impl LibreOfficeConverter {
    pub fn new(soffice: Option<PathBuf>, timeout: Duration) -> Self {
        Self { soffice, timeout }
    }

    fn program(&self) -> Option<PathBuf> {
        find_program(self.soffice.as_deref(), &["soffice", "libreoffice"])
    }
}

/// soffice は `<outdir>/<入力ステム>.pdf` を生成する
fn produced_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    out_dir.join(format!("{}.pdf", stem))
}

impl DocumentConverter for LibreOfficeConverter {
    fn name(&self) -> &'static str {
        "LibreOffice"
    }

    fn is_available(&self) -> bool {
        self.program().is_some()
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let program = self
            .program()
            .ok_or_else(|| OfficePdfError::ConversionFailure("LibreOfficeが見つかりません".into()))?;
        let out_dir = output.parent().unwrap_or_else(|| Path::new("."));

        let mut command = Command::new(program);
        command
            .args(["--headless", "--norestore", "--convert-to", "pdf", "--outdir"])
            .arg(out_dir)
            .arg(input);

        AutomationSession::start("soffice", command)?.finish(self.timeout)?;

        let produced = produced_path(input, out_dir);
        if !produced.exists() {
            return Err(OfficePdfError::ConversionFailure(format!(
                "PDFが生成されませんでした: {}",
                produced.display()
            )));
        }
        if produced != output {
            std::fs::rename(&produced, output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produced_path() {
        assert_eq!(
            produced_path(Path::new("/data/report.final.docx"), Path::new("/out")),
            PathBuf::from("/out/report.final.pdf")
        );
    }

    #[test]
    fn test_unavailable_with_missing_binary() {
        let converter = LibreOfficeConverter::new(
            Some(PathBuf::from("/nonexistent/soffice")),
            Duration::from_secs(1),
        );
        assert!(!converter.is_available());
        let err = converter
            .convert(Path::new("/data/a.docx"), Path::new("/data/a.pdf"))
            .unwrap_err();
        assert!(matches!(err, OfficePdfError::ConversionFailure(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_convert_with_stub_soffice() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        // --outdir の次の引数に <stem>.pdf を書き出すだけのスタブ
        let stub = dir.path().join("soffice");
        std::fs::write(
            &stub,
            "#!/bin/sh\nwhile [ \"$1\" != \"--outdir\" ]; do shift; done\necho '%PDF-stub' > \"$2/$(basename \"${3%.*}\").pdf\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let input = dir.path().join("memo.docx");
        std::fs::write(&input, b"doc").unwrap();
        let output = dir.path().join("memo.pdf");

        let converter = LibreOfficeConverter::new(Some(stub), Duration::from_secs(10));
        assert!(converter.is_available());
        converter.convert(&input, &output).unwrap();
        assert!(std::fs::read_to_string(&output).unwrap().starts_with("%PDF-stub"));
    }
}
