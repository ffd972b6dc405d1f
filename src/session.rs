//! セッション状態
//!
//! 保留ファイル・解析履歴・統計を1つの状態オブジェクトにまとめる。
//! 保留リストと履歴は独立しており、保留のクリアは履歴に影響しない。
//! clear_all のみが両方と統計をリセットする。

use crate::api::ExtractionResult;
use crate::error::{MeishiScanError, Result};
use crate::intake::{self, IntakeReport, PendingFile};
use serde::{Deserialize, Serialize};

/// セッション統計（送信をまたいで単調増加）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_cards: usize,
    pub successful_cards: usize,
    pub tokens_used: u64,
}

impl SessionStats {
    /// 成功率（%、四捨五入。0枚なら0）
    pub fn success_rate(&self) -> u32 {
        if self.total_cards == 0 {
            return 0;
        }
        ((self.successful_cards as f64 / self.total_cards as f64) * 100.0).round() as u32
    }
}

/// 1セッションぶんの状態
#[derive(Debug, Default)]
pub struct Session {
    pending: Vec<PendingFile>,
    history: Vec<ExtractionResult>,
    stats: SessionStats,
    in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    /// 全送信分の結果（エクスポートの元データ）
    pub fn history(&self) -> &[ExtractionResult] {
        &self.history
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// 候補を検証して保留リストへ追加
    pub fn add_files(&mut self, candidates: Vec<PendingFile>) -> IntakeReport {
        intake::admit(&mut self.pending, candidates)
    }

    /// 保留ファイルを1件削除（範囲外はNone）
    pub fn remove_file(&mut self, index: usize) -> Option<PendingFile> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// 保留リストのみクリア（履歴・統計は保持）
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// 全クリア（保留・履歴・統計）
    pub fn clear_all(&mut self) {
        self.pending.clear();
        self.history.clear();
        self.stats = SessionStats::default();
    }

    /// 送信開始（多重送信ガード）
    pub(crate) fn begin_submission(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(MeishiScanError::SubmissionInFlight);
        }
        self.in_flight = true;
        Ok(())
    }

    /// 送信終了。成功・失敗に関わらず必ず呼ぶ
    pub(crate) fn end_submission(&mut self) {
        self.in_flight = false;
    }

    /// 成功レスポンスの結果を履歴へ追記し統計を更新する。
    /// 失敗アイテムも履歴には残る（統計の成功数には入らない）。
    pub(crate) fn record_results(&mut self, results: &[ExtractionResult]) {
        self.stats.total_cards += results.len();
        for result in results {
            if result.success {
                self.stats.successful_cards += 1;
                if let Some(tokens) = result.data.as_ref().and_then(|d| d.tokens) {
                    self.stats.tokens_used += tokens;
                }
            }
        }
        self.history.extend_from_slice(results);
    }
}
