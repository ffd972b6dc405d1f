//! バックエンドAPIクライアント
//!
//! 名刺スキャンAPIの4系統（health / single / batch / download）を
//! reqwestで叩く薄いラッパー。送信系はHTTPステータスではなく
//! ボディの success フラグで成否を判断する（download系のみ
//! ステータスを要求する）。

mod types;

pub use types::{
    BatchResponse, CardData, ExportRequest, ExtractionResult, HealthResponse, SingleResponse,
};

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::error::{MeishiScanError, Result};
use crate::intake::PendingFile;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// ヘルスチェック失敗時の固定モデルリスト
const FALLBACK_MODELS: &[&str] = &["nvidia"];

/// モデル選択肢（ヘルスチェック由来、または固定フォールバック）
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub connected: bool,
    pub models: Vec<String>,
}

impl ModelCatalog {
    /// 選択肢一覧（先頭は常にauto）
    pub fn options(&self) -> Vec<String> {
        let mut options = vec!["auto".to_string()];
        for model in &self.models {
            if model != "auto" {
                options.push(model.clone());
            }
        }
        options
    }
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout_seconds)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| MeishiScanError::ApiParse(e.to_string()))
    }

    /// ヘルスチェック結果をモデル選択肢へ変換する。
    /// 失敗（通信・パース・不調ステータス）は固定リストへフォールバック。
    pub async fn model_catalog(&self) -> ModelCatalog {
        match self.health().await {
            Ok(health) if health.status == "healthy" => ModelCatalog {
                connected: true,
                models: health.models,
            },
            _ => ModelCatalog {
                connected: false,
                models: FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            },
        }
    }

    /// POST /api/single（multipart: image + model）
    pub async fn extract_single(&self, file: &PendingFile, model: &str) -> Result<SingleResponse> {
        let form = Form::new()
            .part("image", Self::file_part(file).await?)
            .text("model", model.to_string());

        let response = self
            .client
            .post(format!("{}/api/single", self.base_url))
            .multipart(form)
            .send()
            .await?;

        response
            .json::<SingleResponse>()
            .await
            .map_err(|e| MeishiScanError::ApiParse(e.to_string()))
    }

    /// POST /api/batch（multipart: images の繰り返し + model）
    pub async fn extract_batch(&self, files: &[PendingFile], model: &str) -> Result<BatchResponse> {
        let mut form = Form::new();
        for file in files {
            form = form.part("images", Self::file_part(file).await?);
        }
        form = form.text("model", model.to_string());

        let response = self
            .client
            .post(format!("{}/api/batch", self.base_url))
            .multipart(form)
            .send()
            .await?;

        response
            .json::<BatchResponse>()
            .await
            .map_err(|e| MeishiScanError::ApiParse(e.to_string()))
    }

    /// POST /api/download/{csv,excel} → 変換済みバイト列
    pub async fn download_export(
        &self,
        format: ExportFormat,
        results: &[ExtractionResult],
    ) -> Result<Vec<u8>> {
        let endpoint = match format {
            ExportFormat::Csv => "/api/download/csv",
            ExportFormat::Excel => "/api/download/excel",
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(&ExportRequest {
                results: results.to_vec(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MeishiScanError::Download(format!(
                "HTTP {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn file_part(file: &PendingFile) -> Result<Part> {
        let bytes = tokio::fs::read(&file.path).await?;
        let part = Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        Ok(part)
    }
}
