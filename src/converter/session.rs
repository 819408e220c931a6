//! オートメーションセッション
//!
//! 変換1回分の外部プロセスを保持する。成功・失敗・タイムアウトのどの経路でも
//! Drop 時にプロセスを終了させ、次のファイルへセッションを持ち越さない。

use crate::error::{OfficePdfError, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct AutomationSession {
    label: String,
    child: Option<Child>,
    /// stderr を読み続けるスレッド（パイプが埋まって子プロセスが止まらないように）
    stderr: Option<JoinHandle<String>>,
}

impl AutomationSession {
    pub fn start(label: impl Into<String>, mut command: Command) -> Result<Self> {
        let label = label.into();
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OfficePdfError::ConversionFailure(format!("{} 起動エラー: {}", label, e)))?;

        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        Ok(Self {
            label,
            child: Some(child),
            stderr,
        })
    }

    /// プロセスの終了を待つ。タイムアウト時はエラー（プロセスは Drop で終了させる）
    pub fn finish(mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            let child = self
                .child
                .as_mut()
                .ok_or_else(|| OfficePdfError::ConversionFailure(format!("{} は既に終了しています", self.label)))?;

            if let Some(status) = child.try_wait()? {
                if status.success() {
                    return Ok(());
                }

                let stderr = self
                    .stderr
                    .take()
                    .and_then(|reader| reader.join().ok())
                    .unwrap_or_default();
                let code = status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "なし".to_string());
                return Err(OfficePdfError::ConversionFailure(format!(
                    "{} が異常終了しました (終了コード {}): {}",
                    self.label,
                    code,
                    stderr.trim()
                )));
            }

            if Instant::now() >= deadline {
                return Err(OfficePdfError::ConversionFailure(format!(
                    "{} がタイムアウトしました ({}秒)",
                    self.label,
                    timeout.as_secs()
                )));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.as_mut().map(|c| c.try_wait()), Some(Ok(None)))
    }
}

impl Drop for AutomationSession {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(None) = child.try_wait() {
            warn!(session = %self.label, "セッションを強制終了します");
            let _ = child.kill();
        }
        let _ = child.wait();
    }
}
