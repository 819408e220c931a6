use tracing_subscriber::EnvFilter;

/// ログ出力を初期化（標準エラーへ出力し、進捗バーと混ざらないようにする）
///
/// `RUST_LOG` があればそれを優先する。
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "office_pdf=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
