use anyhow::Context;
use clap::Parser;
use dialoguer::MultiSelect;
use office_pdf::{cli, config, converter, dispatcher, error, logging, presenter, report, scanner};
use cli::{Cli, Commands, SelectionArgs};
use config::Config;
use converter::Converters;
use office_pdf_common::{format_size, FileList};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut config = Config::load().context("設定の読み込みに失敗")?;
    if let Some(backend) = cli.word_backend {
        config.word_backend = backend;
    }

    match cli.command {
        Commands::List { scan } => {
            let recursive = scan.recursive_or(config.recursive);
            let list = discover(&scan.folder, recursive)?;

            presenter::print_file_list(&list);
            println!("\n{}", presenter::discovery_summary(&list));
        }

        Commands::Convert { scan, selection, report: report_path } => {
            println!("📄 office-pdf - PDF一括変換\n");

            // 1. スキャン
            let recursive = scan.recursive_or(config.recursive);
            println!("[1/3] ファイルをスキャン中...{}", if recursive { " (サブフォルダを含む)" } else { "" });
            let mut list = discover(&scan.folder, recursive)?;
            println!("✔ {}\n", presenter::discovery_summary(&list));

            if list.is_empty() {
                return Err(error::OfficePdfError::NoDocumentsFound(scan.folder.display().to_string()).into());
            }

            // 2. 選択
            select(&mut list, &selection)?;
            let batch = list.selected();
            if batch.is_empty() {
                return Err(error::OfficePdfError::NoSelection.into());
            }
            println!("[2/3] {}件を変換します\n", batch.len());

            // 3. 変換（バックグラウンド）
            println!("[3/3] 変換中...");
            let converters = Arc::new(Converters::from_config(&config));
            let mut handle = dispatcher::spawn_batch(batch, converters, scan.folder.clone());

            let mut view = presenter::ConsolePresenter::new(list);
            while let Some(event) = handle.events.recv().await {
                view.handle(&event);
            }
            let result = handle.join().await.context("変換タスクが異常終了しました")?;

            if let Some(path) = report_path {
                report::write_report(&path, &scan.folder, &result)
                    .with_context(|| format!("レポートの書き込みに失敗: {}", path.display()))?;
                println!("✔ レポートを保存: {}", path.display());
            }

            match result.outcome() {
                dispatcher::BatchOutcome::AllSucceeded => {
                    println!("\n✅ {}", presenter::completion_message(&result));
                }
                dispatcher::BatchOutcome::CompletedWithErrors(_) => {
                    println!("\n⚠ {}", presenter::completion_message(&result));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Config { show } => {
            let path = Config::config_path().ok();
            let path_text = match &path {
                Some(p) if p.exists() => p.display().to_string(),
                Some(p) => format!("{} (なし)", p.display()),
                None => "(ホームディレクトリなし)".to_string(),
            };
            if show {
                println!("設定:");
                println!("  設定ファイル: {}", path_text);
                println!("  Wordバックエンド: {}", config.word_backend);
                println!("  サブフォルダ: {}", if config.recursive { "含める" } else { "含めない" });
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("変換モジュール:");
                for (document_type, name, available) in Converters::from_config(&config).availability() {
                    println!(
                        "  {:<6} {:<16} {}",
                        document_type.label(),
                        name,
                        if available { "利用可" } else { "利用不可" }
                    );
                }
            } else {
                println!("設定ファイル: {}", path_text);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn discover(folder: &Path, recursive: bool) -> anyhow::Result<FileList> {
    let records = scanner::discover(folder, recursive)
        .with_context(|| format!("フォルダの読み込みに失敗: {}", folder.display()))?;
    Ok(FileList::new(records))
}

fn select(list: &mut FileList, selection: &SelectionArgs) -> anyhow::Result<()> {
    selection.apply(list)?;

    if selection.interactive {
        let items: Vec<String> = list
            .records()
            .iter()
            .map(|r| format!("[{}] {} ({})", r.document_type, r.name, format_size(r.size_bytes)))
            .collect();
        let defaults: Vec<bool> = list.records().iter().map(|r| r.selected).collect();

        let chosen = MultiSelect::new()
            .with_prompt("変換するファイルを選択 (スペースで切替, Enterで確定)")
            .items(&items)
            .defaults(&defaults)
            .interact()?;

        list.deselect_all();
        for index in chosen {
            list.toggle(index)?;
        }
    }
    Ok(())
}
