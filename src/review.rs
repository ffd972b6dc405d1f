//! 対話レビューセッション
//!
//! ファイル追加→送信→結果確認→エクスポートを1セッション内で
//! 繰り返す。履歴と統計は送信をまたいで蓄積され、clear all のみで
//! 全リセットする（clear は保留リストだけを消す）。

use crate::api::ApiClient;
use crate::cli::ExportFormat;
use crate::error::{MeishiScanError, Result};
use crate::export;
use crate::intake;
use crate::render;
use crate::session::Session;
use crate::submit;
use dialoguer::Input;
use std::path::{Path, PathBuf};

/// 対話コマンド
enum ReviewAction {
    Add(Vec<PathBuf>),
    List,
    Remove(usize),
    Model(Option<String>),
    Submit,
    Export(ExportFormat),
    ClearPending,
    ClearAll,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_action(line: &str) -> ReviewAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReviewAction::Empty;
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or("");
    let rest: Vec<&str> = parts.collect();

    match command {
        "add" => ReviewAction::Add(rest.iter().map(PathBuf::from).collect()),
        "list" | "ls" => ReviewAction::List,
        // 表示は1始まり、内部は0始まり
        "remove" | "rm" => match rest.first().and_then(|s| s.parse::<usize>().ok()) {
            Some(number) if number >= 1 => ReviewAction::Remove(number - 1),
            _ => ReviewAction::Unknown(trimmed.to_string()),
        },
        "model" => ReviewAction::Model(rest.first().map(|s| s.to_string())),
        "submit" => ReviewAction::Submit,
        "export" => match rest.first().map(|s| s.parse::<ExportFormat>()) {
            Some(Ok(format)) => ReviewAction::Export(format),
            _ => ReviewAction::Unknown(trimmed.to_string()),
        },
        "clear" if rest.first() == Some(&"all") => ReviewAction::ClearAll,
        "clear" => ReviewAction::ClearPending,
        "status" => ReviewAction::Status,
        "help" | "?" => ReviewAction::Help,
        "quit" | "q" | "exit" => ReviewAction::Quit,
        _ => ReviewAction::Unknown(trimmed.to_string()),
    }
}

fn print_usage() {
    println!("---");
    println!("操作: add <path..> / list / remove <n> / model [id] / submit / export <csv|excel> / clear [all] / status / quit");
    println!("---");
}

/// 対話セッションを実行する
pub async fn run_review(client: &ApiClient, initial_model: String, verbose: bool) -> Result<()> {
    // モデル一覧の取得（失敗しても固定リストで続行）
    let catalog = client.model_catalog().await;
    if catalog.connected {
        println!("✔ API接続OK • モデル: {}", catalog.models.join(", "));
    } else {
        println!("✖ APIに接続できません（固定モデルリストで続行）");
    }

    let mut session = Session::new();
    let mut model = initial_model;

    print_usage();
    println!();

    loop {
        let line: String = Input::new()
            .with_prompt("meishi")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MeishiScanError::Prompt(e.to_string()))?;

        match parse_action(&line) {
            ReviewAction::Empty => {}

            ReviewAction::Add(paths) if paths.is_empty() => {
                println!("使い方: add <path..>");
            }

            ReviewAction::Add(paths) => match intake::collect_candidates(&paths) {
                Ok(candidates) => {
                    let report = session.add_files(candidates);
                    render::print_intake_report(&report);
                    if verbose {
                        for name in &report.added {
                            println!("  + {}", name);
                        }
                    }
                }
                Err(e) => println!("✖ {}", e),
            },

            ReviewAction::List => {
                if session.pending().is_empty() {
                    println!("保留中のファイルはありません");
                } else {
                    for (index, file) in session.pending().iter().enumerate() {
                        println!(
                            "{:>3}) {} ({:.2} MB, {})",
                            index + 1,
                            file.file_name,
                            file.size as f64 / 1024.0 / 1024.0,
                            file.content_type
                        );
                    }
                }
            }

            ReviewAction::Remove(index) => match session.remove_file(index) {
                Some(file) => println!("✔ 削除: {}", file.file_name),
                None => println!("番号が範囲外です"),
            },

            ReviewAction::Model(None) => {
                println!("現在のモデル: {}", render::model_display_name(&model));
                println!("選択肢: {}", catalog.options().join(", "));
            }

            ReviewAction::Model(Some(id)) => {
                model = id;
                println!("✔ モデルを変更: {}", render::model_display_name(&model));
            }

            ReviewAction::Submit => {
                if session.pending().is_empty() {
                    println!("送信するファイルがありません");
                    continue;
                }

                let spinner = render::submission_spinner(&format!(
                    "AI解析中... (モデル: {})",
                    render::model_display_name(&model)
                ));
                let outcome = submit::submit_pending(&mut session, client, &model).await;
                spinner.finish_and_clear();

                match outcome {
                    Ok(results) => {
                        render::print_views(&render::build_views(&results));
                        println!("✔ {}枚の解析に成功", submit::successful_count(&results));
                        render::print_stats(&session.stats());
                    }
                    Err(e) => println!("✖ 解析に失敗: {}", e),
                }
            }

            ReviewAction::Export(format) => {
                match export::export_history(client, session.history(), format, Path::new(".")).await
                {
                    Ok(path) => println!("✔ エクスポート完了: {}", path.display()),
                    Err(MeishiScanError::NoExportData) => println!("✖ No data to export"),
                    Err(e) => println!("✖ エクスポートに失敗: {}", e),
                }
            }

            ReviewAction::ClearPending => {
                session.clear_pending();
                println!("✔ 保留リストをクリアしました（履歴は保持）");
            }

            ReviewAction::ClearAll => {
                session.clear_all();
                println!("✔ 全てクリアしました（保留・履歴・統計）");
            }

            ReviewAction::Status => {
                println!(
                    "保留: {}件 / 履歴: {}件 / モデル: {}",
                    session.pending().len(),
                    session.history().len(),
                    render::model_display_name(&model)
                );
                render::print_stats(&session.stats());
            }

            ReviewAction::Help => print_usage(),

            ReviewAction::Quit => {
                println!("終了します");
                break;
            }

            ReviewAction::Unknown(input) => {
                println!("不明なコマンド: {} (helpで一覧)", input);
            }
        }
    }

    Ok(())
}
