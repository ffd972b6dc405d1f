//! APIレスポンス/リクエストの型定義
//!
//! カード項目（CardData）のワイヤ形式はcamelCase。存在しない項目は
//! レスポンスに含まれない前提なので、全項目をdefault許容にしている。
//! 結果エンベロープ側（success / model_used / filename）はsnakeのまま。

use serde::{Deserialize, Serialize};

/// 名刺から抽出した項目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// 解析に消費したトークン数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,

    /// バックエンドが付与するモデル名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// 1ファイル分の解析結果（成功/失敗タグつき、受信後は不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CardData>,

    #[serde(default)]
    pub model_used: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// /api/single のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct SingleResponse {
    pub success: bool,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub data: Option<CardData>,

    #[serde(default)]
    pub model_used: String,

    #[serde(default)]
    pub error: Option<String>,
}

impl SingleResponse {
    /// 単発レスポンスをバッチと同じ1件分の形へ正規化
    pub fn into_result(self) -> ExtractionResult {
        ExtractionResult {
            success: self.success,
            filename: self.filename,
            data: self.data,
            model_used: self.model_used,
            error: self.error,
        }
    }
}

/// /api/batch のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    pub success: bool,

    #[serde(default)]
    pub total: usize,

    #[serde(default)]
    pub results: Vec<ExtractionResult>,

    #[serde(default)]
    pub error: Option<String>,
}

/// /health のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default)]
    pub models: Vec<String>,

    /// 情報提供のみ（クライアントは参照しない）
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// エクスポートAPIへ送るリクエストボディ
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    pub results: Vec<ExtractionResult>,
}
