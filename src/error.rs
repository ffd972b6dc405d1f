use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeishiScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(#[from] reqwest::Error),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("サーバ側エラー: {0}")]
    Backend(String),

    #[error("送信処理が既に実行中です")]
    SubmissionInFlight,

    #[error("エクスポートするデータがありません")]
    NoExportData,

    #[error("ダウンロードに失敗: {0}")]
    Download(String),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MeishiScanError>;
