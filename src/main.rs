use clap::Parser;
use meishi_scan::{api, cli, config, error, export, intake, render, review, session, submit};

use cli::{Cli, Commands};
use config::Config;
use error::{MeishiScanError, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scan {
            paths,
            model,
            export: export_format,
            output,
            save,
        } => {
            println!("💳 meishi-scan - 名刺解析\n");

            let client = api::ApiClient::from_config(&config)?;
            let model = model.unwrap_or_else(|| config.default_model.clone());

            // 1. API確認（失敗しても受付・送信は止めない）
            let catalog = client.model_catalog().await;
            if catalog.connected {
                println!("✔ API接続OK • モデル: {}", catalog.models.join(", "));
            } else {
                println!("✖ APIに接続できません（固定モデルリストで続行）");
            }

            // 2. ファイル受付
            println!("\n[1/3] ファイルを検証中...");
            let candidates = intake::collect_candidates(&paths)?;
            let mut session = session::Session::new();
            let report = session.add_files(candidates);
            render::print_intake_report(&report);

            if cli.verbose {
                for file in session.pending() {
                    println!(
                        "  - {} ({:.2} MB, {})",
                        file.file_name,
                        file.size as f64 / 1024.0 / 1024.0,
                        file.content_type
                    );
                }
            }

            // 3. 送信・解析
            println!("\n[2/3] AI解析中... (モデル: {})", render::model_display_name(&model));
            let spinner = render::submission_spinner("送信中...");
            let outcome = submit::submit_pending(&mut session, &client, &model).await;
            spinner.finish_and_clear();
            let results = outcome?;

            if results.is_empty() {
                println!("送信対象がないため解析をスキップしました");
            } else {
                println!();
                render::print_views(&render::build_views(&results));
                println!("✔ {}枚の解析に成功", submit::successful_count(&results));
                render::print_stats(&session.stats());
            }

            // 4. 保存・エクスポート
            if let Some(save_path) = save {
                export::save_history(session.history(), &save_path)?;
                println!("✔ 履歴を保存: {}", save_path.display());
            }

            if let Some(format) = export_format {
                println!("\n[3/3] エクスポート中... ({})", format);
                let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
                match export::export_history(&client, session.history(), format, &output_dir).await
                {
                    Ok(path) => println!("✔ エクスポート完了: {}", path.display()),
                    Err(MeishiScanError::NoExportData) => println!("✖ No data to export"),
                    Err(e) => return Err(e),
                }
            }

            println!("\n✅ 完了");
        }

        Commands::Review { model } => {
            println!("💳 meishi-scan - 対話セッション\n");

            let client = api::ApiClient::from_config(&config)?;
            let model = model.unwrap_or_else(|| config.default_model.clone());
            review::run_review(&client, model, cli.verbose).await?;
        }

        Commands::Export {
            input,
            format,
            output,
        } => {
            println!("📄 meishi-scan - エクスポート\n");

            let client = api::ApiClient::from_config(&config)?;
            let history = export::load_history(&input)?;
            println!("✔ 履歴を読み込み: {}件", history.len());

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            match export::export_history(&client, &history, format, &output_dir).await {
                Ok(path) => println!("✔ エクスポート完了: {}", path.display()),
                Err(MeishiScanError::NoExportData) => println!("✖ No data to export"),
                Err(e) => return Err(e),
            }
        }

        Commands::Health => {
            let client = api::ApiClient::from_config(&config)?;

            match client.health().await {
                Ok(health) if health.status == "healthy" => {
                    println!("✔ API Connected • Models: {}", health.models.join(", "));
                    if cli.verbose {
                        for model in &health.models {
                            println!("  - {} ({})", model, render::model_display_name(model));
                        }
                    }
                }
                Ok(health) => println!("✖ APIが不調です: status={}", health.status),
                Err(e) => println!("✖ API Connection Failed: {}", e),
            }
        }

        Commands::Config {
            set_api_url,
            set_model,
            show,
        } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                println!("✔ APIベースURLを設定しました");
            }

            if let Some(model) = set_model {
                config.set_default_model(model)?;
                println!("✔ 既定モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  APIベースURL: {}", config.api_base_url);
                println!("  既定モデル: {}", config.default_model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
