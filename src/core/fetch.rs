use crate::adapters::storage::RequestWorkspace;
use crate::domain::model::CandidateImage;
use crate::domain::ports::ImageFetcher;

/// 逐一下載網址到 workspace，失敗的網址直接略過
///
/// 結果保持 `urls` 的順序，每筆都帶有來源網址
pub async fn download_images(
    fetcher: &dyn ImageFetcher,
    urls: &[String],
    workspace: &mut RequestWorkspace,
) -> Vec<CandidateImage> {
    let mut candidates = Vec::with_capacity(urls.len());

    for (index, url) in urls.iter().enumerate() {
        let data = match fetcher.fetch_image(url).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("📥 Failed to download {}: {}", url, e);
                continue;
            }
        };

        match workspace.store_candidate(index, &data) {
            Ok(path) => candidates.push(CandidateImage {
                source_url: url.clone(),
                path,
            }),
            Err(e) => {
                tracing::warn!("📥 Failed to store image from {}: {}", url, e);
            }
        }
    }

    tracing::info!("📥 Downloaded {}/{} candidate images", candidates.len(), urls.len());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::StubFetcher;
    use tempfile::TempDir;

    fn urls(names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| format!("https://img.example.com/{}", n))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_downloads_are_skipped_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = RequestWorkspace::create(temp_dir.path(), temp_dir.path()).unwrap();
        let urls = urls(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        let fetcher = StubFetcher::failing_on(&[&urls[1], &urls[2]]);

        let candidates = download_images(&fetcher, &urls, &mut workspace).await;

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].source_url, urls[0]);
        assert_eq!(candidates[1].source_url, urls[3]);
        assert_eq!(
            std::fs::read(&candidates[1].path).unwrap(),
            urls[3].as_bytes()
        );
        assert_eq!(fetcher.calls(), 4);
        assert_eq!(workspace.tracked_files().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = RequestWorkspace::create(temp_dir.path(), temp_dir.path()).unwrap();
        let fetcher = StubFetcher::healthy();

        let candidates = download_images(&fetcher, &[], &mut workspace).await;

        assert!(candidates.is_empty());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_failure_gives_same_empty_result() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = RequestWorkspace::create(temp_dir.path(), temp_dir.path()).unwrap();
        let urls = urls(&["offline.jpg"]);
        let fetcher = StubFetcher::failing_on(&[&urls[0]]);

        let first = download_images(&fetcher, &urls, &mut workspace).await;
        let second = download_images(&fetcher, &urls, &mut workspace).await;

        assert!(first.is_empty());
        assert_eq!(first, second);
        assert!(workspace.tracked_files().is_empty());
    }
}
