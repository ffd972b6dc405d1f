//! 解析結果の表示
//!
//! ExtractionResultの並びを表示用ビューモデル（CardView）へ写像する
//! 純関数と、端末への描画。存在しない項目は行ごと出さない。
//! 表示するのは常に直近の送信分のみで、履歴全体は描画しない。

use crate::api::ExtractionResult;
use crate::intake::IntakeReport;
use crate::session::SessionStats;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 1枚分の表示モデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// 見出し（ファイル名、なければ "Card N"）
    pub heading: String,
    /// 使用モデルのバッジ
    pub badge: String,
    /// 表示する項目行（存在する項目のみ）
    pub rows: Vec<(&'static str, String)>,
    /// 失敗時のエラーメッセージ
    pub error: Option<String>,
}

/// モデルIDから表示名へ（未知のIDはそのまま返す）
pub fn model_display_name(model: &str) -> &str {
    match model {
        "auto" => "Auto Select",
        "nvidia" => "NVIDIA Phi-3.5 Vision",
        "mistral" => "Mistral 14B Instruct",
        "microsoft" => "Microsoft Phi-4 Multimodal",
        "gemini" => "Google Gemini 2.5 Flash",
        other => other,
    }
}

/// 結果リストをビューモデルへ変換（純関数）
pub fn build_views(results: &[ExtractionResult]) -> Vec<CardView> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| build_view(result, index))
        .collect()
}

fn build_view(result: &ExtractionResult, index: usize) -> CardView {
    let heading = result
        .filename
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Card {}", index + 1));
    let badge = result.model_used.clone();

    if !result.success {
        return CardView {
            heading,
            badge,
            rows: Vec::new(),
            error: Some(
                result
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to process this card".to_string()),
            ),
        };
    }

    let mut rows = Vec::new();
    if let Some(data) = &result.data {
        push_row(&mut rows, "Name", data.name.as_deref());
        push_row(&mut rows, "Title", data.title.as_deref());
        push_row(&mut rows, "Company", data.company.as_deref());
        push_row(&mut rows, "Email", data.email.as_deref());
        if !data.phone_numbers.is_empty() {
            rows.push(("Phone", data.phone_numbers.join(", ")));
        }
        push_row(&mut rows, "Website", data.website.as_deref());
        push_row(&mut rows, "Address", data.address.as_deref());
        if let Some(tokens) = data.tokens {
            rows.push(("Tokens Used", tokens.to_string()));
        }
    }

    CardView {
        heading,
        badge,
        rows,
        error: None,
    }
}

fn push_row(rows: &mut Vec<(&'static str, String)>, label: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.trim().is_empty() {
            rows.push((label, value.to_string()));
        }
    }
}

/// ビューモデルを端末へ描画
pub fn print_views(views: &[CardView]) {
    for view in views {
        println!("── {} [{}]", view.heading, model_display_name(&view.badge));
        match &view.error {
            Some(error) => println!("  ✖ {}", error),
            None => {
                for (label, value) in &view.rows {
                    println!("  {:<12} {}", label, value);
                }
            }
        }
        println!();
    }
}

/// 受付結果の通知（検証スキップ・重複・追加の3種を集約表示）
pub fn print_intake_report(report: &IntakeReport) {
    if let Some(message) = report.skipped_message() {
        println!("✖ {}", message);
    }
    if let Some(message) = report.duplicate_message() {
        println!("✖ {}", message);
    }
    if let Some(message) = report.added_message() {
        println!("✔ {}", message);
    }
}

/// 送信中のブロッキングスピナー
pub fn submission_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// 統計サマリを描画
pub fn print_stats(stats: &SessionStats) {
    println!(
        "集計: {}枚 / 成功率 {}% / トークン {}",
        stats.total_cards,
        stats.success_rate(),
        stats.tokens_used
    );
}
