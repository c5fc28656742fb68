use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 上傳到 `/verify` 的照片，驗證通過前只保存在記憶體
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateImage {
    pub source_url: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub image: String,
    pub verified: bool,
    pub distance: f64,
}

impl MatchResult {
    pub fn new(candidate: &CandidateImage, verification: Verification) -> Self {
        Self {
            image: candidate.source_url.clone(),
            verified: verification.verified,
            distance: verification.distance,
        }
    }
}
