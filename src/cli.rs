use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meishi-scan")]
#[command(about = "名刺スキャンAPIクライアント（AI解析・CSV/Excelエクスポート）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 名刺画像を送信して解析結果を表示
    Scan {
        /// 名刺画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 使用モデル（auto/nvidia/mistral/microsoft/gemini）
        #[arg(short, long)]
        model: Option<String>,

        /// 解析後にエクスポートする形式 (csv/excel)
        #[arg(short, long)]
        export: Option<ExportFormat>,

        /// エクスポート先ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// セッション履歴をJSONで保存
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// 対話セッション（追加・送信・エクスポートを繰り返す）
    Review {
        /// 使用モデル
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 保存した履歴JSONからCSV/Excelを生成
    Export {
        /// 履歴JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (csv/excel)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// 出力先ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// APIの稼働状況と利用可能モデルを確認
    Health,

    /// 設定を表示/編集
    Config {
        /// APIベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 既定モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// エクスポート形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// 保存ファイルの拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use csv or excel", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}
