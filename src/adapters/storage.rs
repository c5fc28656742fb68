use crate::domain::model::UploadedImage;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 單一請求擁有的暫存檔
///
/// 所有檔名都以請求的 token 命名，同時進行的請求不會共用路徑。
/// 寫入前先記錄路徑，由 [`RequestWorkspace::cleanup`] 移除，drop 時也會執行。
#[derive(Debug)]
pub struct RequestWorkspace {
    token: String,
    upload_dir: PathBuf,
    scraped_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl RequestWorkspace {
    pub fn create(upload_dir: impl Into<PathBuf>, scraped_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let scraped_dir = scraped_dir.into();

        fs::create_dir_all(&upload_dir)?;
        fs::create_dir_all(&scraped_dir)?;

        Ok(Self {
            token: Uuid::new_v4().simple().to_string(),
            upload_dir,
            scraped_dir,
            files: Vec::new(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    #[cfg(test)]
    pub(crate) fn tracked_files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn store_upload(&mut self, image: &UploadedImage) -> Result<PathBuf> {
        let path = self
            .upload_dir
            .join(format!("{}.{}", self.token, image.extension));
        self.write_tracked(path, &image.bytes)
    }

    pub fn store_candidate(&mut self, index: usize, data: &[u8]) -> Result<PathBuf> {
        let path = self
            .scraped_dir
            .join(format!("{}_{}.jpg", self.token, index));
        self.write_tracked(path, data)
    }

    fn write_tracked(&mut self, path: PathBuf, data: &[u8]) -> Result<PathBuf> {
        self.files.push(path.clone());
        fs::write(&path, data)?;
        tracing::debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(path)
    }

    /// 每個記錄的檔案只移除一次，回傳實際刪除的數量
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.files.drain(..) {
            match remove_file(&path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("🧹 Failed to remove {}: {}", path.display(), e);
                }
            }
        }
        removed
    }
}

impl Drop for RequestWorkspace {
    fn drop(&mut self) {
        if !self.files.is_empty() {
            let removed = self.cleanup();
            tracing::debug!("🧹 Workspace {} dropped, removed {} files", self.token, removed);
        }
    }
}

fn remove_file(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
