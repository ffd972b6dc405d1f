//! ファイル受付モジュール
//!
//! パス/フォルダから候補を収集し、種別・サイズ・重複を検証して
//! 保留リストへ追加する。検証で弾いたぶんは理由つきで集計し、
//! 受付済みのファイルには一切手を加えない。

use crate::error::{MeishiScanError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 受付可能なMIMEタイプ
const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// 最大ファイルサイズ（50MB）
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 保留中のファイル
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub content_type: String,
}

/// 検証で弾いた理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidType,
    TooLarge,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InvalidType => write!(f, "Invalid file type"),
            SkipReason::TooLarge => write!(f, "File too large (>50MB)"),
        }
    }
}

/// 1回の追加操作ぶんの受付結果
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// 新規に受け付けたファイル名
    pub added: Vec<String>,
    /// 検証で弾いたファイル名と理由
    pub skipped: Vec<(String, SkipReason)>,
    /// 重複で弾いたファイル名
    pub duplicates: Vec<String>,
}

impl IntakeReport {
    pub fn skipped_message(&self) -> Option<String> {
        if self.skipped.is_empty() {
            return None;
        }
        let detail = self
            .skipped
            .iter()
            .map(|(name, reason)| format!("{} ({})", name, reason))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("{} file(s) skipped: {}", self.skipped.len(), detail))
    }

    pub fn duplicate_message(&self) -> Option<String> {
        if self.duplicates.is_empty() {
            return None;
        }
        Some(format!("{} duplicate file(s) skipped", self.duplicates.len()))
    }

    pub fn added_message(&self) -> Option<String> {
        if self.added.is_empty() {
            return None;
        }
        Some(format!("{} file(s) added successfully", self.added.len()))
    }
}

/// 拡張子からMIMEタイプを推定（大文字小文字は区別しない）
fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn candidate_from(path: &Path) -> Result<PendingFile> {
    let meta = std::fs::metadata(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(PendingFile {
        path: path.to_path_buf(),
        file_name,
        size: meta.len(),
        content_type: content_type_for(path),
    })
}

/// パス（ファイル/フォルダ）から候補を収集する。
///
/// フォルダは直下のみ（再帰しない）をファイル名順に展開する。
/// 対象外の種別もここでは候補に含め、検証側で理由つきで弾く。
pub fn collect_candidates(paths: &[PathBuf]) -> Result<Vec<PendingFile>> {
    let mut candidates = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(MeishiScanError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            for entry in WalkDir::new(path)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.path().is_file() {
                    candidates.push(candidate_from(entry.path())?);
                }
            }
        } else {
            candidates.push(candidate_from(path)?);
        }
    }

    Ok(candidates)
}

/// 候補を検証して保留リストへ追加する。
///
/// 検証順: 種別→サイズ→重複。種別が不正な場合はサイズ超過でも
/// 理由は「Invalid file type」になる。重複判定は既存の保留分との
/// (ファイル名, サイズ) 一致のみで、同一バッチ内の重複は対象外。
/// 到着順は保持する。
pub fn admit(pending: &mut Vec<PendingFile>, candidates: Vec<PendingFile>) -> IntakeReport {
    let mut report = IntakeReport::default();
    let mut valid = Vec::new();

    for candidate in candidates {
        if !ALLOWED_TYPES.contains(&candidate.content_type.as_str()) {
            report
                .skipped
                .push((candidate.file_name.clone(), SkipReason::InvalidType));
        } else if candidate.size > MAX_FILE_SIZE {
            report
                .skipped
                .push((candidate.file_name.clone(), SkipReason::TooLarge));
        } else {
            valid.push(candidate);
        }
    }

    let existing = pending.len();
    for candidate in valid {
        let is_duplicate = pending[..existing]
            .iter()
            .any(|f| f.file_name == candidate.file_name && f.size == candidate.size);

        if is_duplicate {
            report.duplicates.push(candidate.file_name.clone());
        } else {
            report.added.push(candidate.file_name.clone());
            pending.push(candidate);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_file(name: &str, size: u64, content_type: &str) -> PendingFile {
        PendingFile {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            size,
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a.gif")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_admit_rejects_invalid_type() {
        let mut pending = Vec::new();
        let report = admit(&mut pending, vec![pending_file("memo.txt", 100, "application/octet-stream")]);

        assert!(pending.is_empty());
        assert_eq!(report.skipped, vec![("memo.txt".to_string(), SkipReason::InvalidType)]);
        assert!(report.added.is_empty());
    }

    #[test]
    fn test_admit_rejects_oversized() {
        let mut pending = Vec::new();
        let report = admit(
            &mut pending,
            vec![pending_file("big.png", MAX_FILE_SIZE + 1, "image/png")],
        );

        assert!(pending.is_empty());
        assert_eq!(report.skipped, vec![("big.png".to_string(), SkipReason::TooLarge)]);
    }

    #[test]
    fn test_admit_exactly_max_size_is_accepted() {
        let mut pending = Vec::new();
        let report = admit(
            &mut pending,
            vec![pending_file("edge.png", MAX_FILE_SIZE, "image/png")],
        );

        assert_eq!(report.added, vec!["edge.png".to_string()]);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_invalid_type_takes_precedence_over_size() {
        // 種別不正かつサイズ超過 → 理由は種別不正
        let mut pending = Vec::new();
        let report = admit(
            &mut pending,
            vec![pending_file("huge.bmp", MAX_FILE_SIZE + 1, "application/octet-stream")],
        );

        assert_eq!(report.skipped, vec![("huge.bmp".to_string(), SkipReason::InvalidType)]);
    }

    #[test]
    fn test_admit_rejects_duplicate_of_pending() {
        let mut pending = Vec::new();
        admit(&mut pending, vec![pending_file("card.png", 2048, "image/png")]);
        let report = admit(&mut pending, vec![pending_file("card.png", 2048, "image/png")]);

        assert_eq!(pending.len(), 1);
        assert_eq!(report.duplicates, vec!["card.png".to_string()]);
        assert!(report.added.is_empty());
    }

    #[test]
    fn test_same_name_different_size_is_not_duplicate() {
        let mut pending = Vec::new();
        admit(&mut pending, vec![pending_file("card.png", 2048, "image/png")]);
        let report = admit(&mut pending, vec![pending_file("card.png", 4096, "image/png")]);

        assert_eq!(report.added, vec!["card.png".to_string()]);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_same_batch_duplicates_both_admitted() {
        // 重複判定は既存の保留分のみが対象
        let mut pending = Vec::new();
        let report = admit(
            &mut pending,
            vec![
                pending_file("card.png", 2048, "image/png"),
                pending_file("card.png", 2048, "image/png"),
            ],
        );

        assert_eq!(report.added.len(), 2);
        assert!(report.duplicates.is_empty());
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_admit_preserves_arrival_order() {
        let mut pending = Vec::new();
        admit(
            &mut pending,
            vec![
                pending_file("b.png", 1, "image/png"),
                pending_file("bad.txt", 1, "application/octet-stream"),
                pending_file("a.png", 2, "image/png"),
            ],
        );

        let names: Vec<&str> = pending.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
    }

    #[test]
    fn test_report_messages() {
        let mut pending = Vec::new();
        let report = admit(
            &mut pending,
            vec![
                pending_file("ok.png", 1, "image/png"),
                pending_file("big.png", MAX_FILE_SIZE + 1, "image/png"),
                pending_file("memo.txt", 1, "application/octet-stream"),
            ],
        );

        assert_eq!(
            report.skipped_message().unwrap(),
            "2 file(s) skipped: big.png (File too large (>50MB)), memo.txt (Invalid file type)"
        );
        assert!(report.duplicate_message().is_none());
        assert_eq!(report.added_message().unwrap(), "1 file(s) added successfully");
    }
}
