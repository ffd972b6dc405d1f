//! 送信オーケストレーション
//!
//! 保留リストを単発/バッチエンドポイントへ振り分け、成功レスポンス
//! のみ履歴・統計へ反映する。通信エラーとトップレベルの
//! success:false はどちらもセッション状態を変えない。

use crate::api::{ApiClient, ExtractionResult};
use crate::error::{MeishiScanError, Result};
use crate::intake::PendingFile;
use crate::session::Session;

/// 保留中のファイルを送信して解析する。
///
/// 戻り値は今回の送信分の結果のみ（履歴全体ではない）。
/// 保留リストが空の場合はリクエストを発行せず空を返す。
/// 多重送信はガードで弾き、ガードは成否に関わらず解除する。
pub async fn submit_pending(
    session: &mut Session,
    client: &ApiClient,
    model: &str,
) -> Result<Vec<ExtractionResult>> {
    if session.pending().is_empty() {
        return Ok(Vec::new());
    }

    let files: Vec<PendingFile> = session.pending().to_vec();

    session.begin_submission()?;
    let outcome = dispatch(&files, client, model).await;
    session.end_submission();

    let results = outcome?;
    session.record_results(&results);
    Ok(results)
}

/// 1件なら /api/single、2件以上なら /api/batch
async fn dispatch(
    files: &[PendingFile],
    client: &ApiClient,
    model: &str,
) -> Result<Vec<ExtractionResult>> {
    if files.len() == 1 {
        let response = client.extract_single(&files[0], model).await?;
        if !response.success {
            return Err(MeishiScanError::Backend(
                response
                    .error
                    .unwrap_or_else(|| "Processing failed".to_string()),
            ));
        }
        Ok(vec![response.into_result()])
    } else {
        let response = client.extract_batch(files, model).await?;
        if !response.success {
            return Err(MeishiScanError::Backend(
                response
                    .error
                    .unwrap_or_else(|| "Processing failed".to_string()),
            ));
        }
        Ok(response.results)
    }
}

/// 今回の送信分のうち成功した件数
pub fn successful_count(results: &[ExtractionResult]) -> usize {
    results.iter().filter(|r| r.success).count()
}
