//! エクスポートモジュール
//!
//! 履歴から成功分のみ抽出してサーバ側変換エンドポイントへ送り、
//! 返ってきたバイト列を日付入りファイル名でローカル保存する。
//! 成功分が1件もない場合はリクエスト自体を発行しない。

use crate::api::{ApiClient, ExtractionResult};
use crate::cli::ExportFormat;
use crate::error::{MeishiScanError, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// 履歴から成功分のみ抽出
pub fn successful_results(history: &[ExtractionResult]) -> Vec<ExtractionResult> {
    history.iter().filter(|r| r.success).cloned().collect()
}

/// 日付入りの出力パスを組み立てる
fn output_path_for(output_dir: &Path, format: ExportFormat, date: &str) -> PathBuf {
    output_dir.join(format!("business_cards_{}.{}", date, format.extension()))
}

/// 履歴をサーバ側で変換してローカル保存し、出力パスを返す。
pub async fn export_history(
    client: &ApiClient,
    history: &[ExtractionResult],
    format: ExportFormat,
    output_dir: &Path,
) -> Result<PathBuf> {
    let successful = successful_results(history);
    if successful.is_empty() {
        return Err(MeishiScanError::NoExportData);
    }

    let bytes = client.download_export(format, &successful).await?;

    let date = Local::now().format("%Y-%m-%d").to_string();
    let output_path = output_path_for(output_dir, format, &date);
    std::fs::write(&output_path, bytes)?;

    Ok(output_path)
}

/// セッション履歴をJSONで保存（exportコマンドの入力になる）
pub fn save_history(history: &[ExtractionResult], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(history)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// 保存した履歴JSONを読み込む
pub fn load_history(path: &Path) -> Result<Vec<ExtractionResult>> {
    if !path.exists() {
        return Err(MeishiScanError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
