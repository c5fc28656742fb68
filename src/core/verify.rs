use crate::adapters::storage::RequestWorkspace;
use crate::config::toml_config::AppConfig;
use crate::core::fetch::download_images;
use crate::domain::model::{CandidateImage, MatchResult, UploadedImage};
use crate::domain::ports::{FaceVerifier, ImageFetcher, ImageSearch};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub result_count: usize,
    pub upload_dir: PathBuf,
    pub scraped_dir: PathBuf,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            result_count: config.search.result_count,
            upload_dir: PathBuf::from(&config.storage.upload_dir),
            scraped_dir: PathBuf::from(&config.storage.scraped_dir),
        }
    }
}

/// 針對單一上傳圖片執行搜尋、下載與比對
pub struct VerificationEngine {
    search: Arc<dyn ImageSearch>,
    fetcher: Arc<dyn ImageFetcher>,
    verifier: Arc<dyn FaceVerifier>,
    settings: EngineSettings,
}

impl VerificationEngine {
    pub fn new(
        search: Arc<dyn ImageSearch>,
        fetcher: Arc<dyn ImageFetcher>,
        verifier: Arc<dyn FaceVerifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            search,
            fetcher,
            verifier,
            settings,
        }
    }

    /// 暫存檔全部由 workspace 管理：正常流程明確清除，提早返回、panic 或取消時由 `Drop` 清除
    pub async fn run(&self, upload: &UploadedImage, query: &str) -> Result<Vec<MatchResult>> {
        let mut workspace =
            RequestWorkspace::create(&self.settings.upload_dir, &self.settings.scraped_dir)?;

        tracing::info!(
            "🚀 Request {}: verifying '{}' against search results for '{}'",
            workspace.token(),
            upload.filename,
            query
        );

        let uploaded_path = workspace.store_upload(upload)?;

        let urls = self
            .search
            .search_images(query, self.settings.result_count)
            .await?;
        tracing::debug!("Scraped image URLs: {:?}", urls);

        let candidates = download_images(self.fetcher.as_ref(), &urls, &mut workspace).await;
        let matches = self.verify_candidates(&uploaded_path, &candidates).await;

        let removed = workspace.cleanup();
        tracing::info!(
            "✅ Request {}: {} matches from {} candidates, removed {} temporary files",
            workspace.token(),
            matches.len(),
            candidates.len(),
            removed
        );

        Ok(matches)
    }

    /// 每個候選圖片比對一次，失敗的配對直接略過
    pub async fn verify_candidates(
        &self,
        uploaded_path: &Path,
        candidates: &[CandidateImage],
    ) -> Vec<MatchResult> {
        let mut matches = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.verifier.verify(uploaded_path, &candidate.path).await {
                Ok(verification) => {
                    tracing::debug!(
                        "{} -> verified={} distance={:.4}",
                        candidate.source_url,
                        verification.verified,
                        verification.distance
                    );
                    matches.push(MatchResult::new(candidate, verification));
                }
                Err(e) => {
                    tracing::warn!(
                        "🧑 Verification failed for {} ({}): {}",
                        candidate.path.display(),
                        candidate.source_url,
                        e
                    );
                }
            }
        }

        matches
    }
}
