use crate::domain::model::Verification;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// 依搜尋服務的順序回傳 `query` 最多 `count` 個圖片網址
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<String>>;
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait FaceVerifier: Send + Sync {
    /// 比對兩個本機圖片檔中的人臉
    async fn verify(&self, img1_path: &Path, img2_path: &Path) -> Result<Verification>;
}
