pub mod fetch;
pub mod verify;

pub use crate::domain::model::{CandidateImage, MatchResult, UploadedImage, Verification};
pub use crate::domain::ports::{FaceVerifier, ImageFetcher, ImageSearch};
pub use crate::utils::error::Result;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::model::Verification;
    use crate::domain::ports::{FaceVerifier, ImageFetcher, ImageSearch};
    use crate::utils::error::{FaceCheckError, Result};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct StubSearch {
        outcome: std::result::Result<Vec<String>, String>,
    }

    impl StubSearch {
        pub fn returning(urls: Vec<String>) -> Self {
            Self { outcome: Ok(urls) }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl ImageSearch for StubSearch {
        async fn search_images(&self, _query: &str, count: usize) -> Result<Vec<String>> {
            match &self.outcome {
                Ok(urls) => Ok(urls.iter().take(count).cloned().collect()),
                Err(message) => Err(FaceCheckError::SearchError {
                    message: message.clone(),
                }),
            }
        }
    }

    /// 直接以網址本身作為圖片內容
    pub struct StubFetcher {
        failing: HashSet<String>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        pub fn healthy() -> Self {
            Self {
                failing: HashSet::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing_on<S: AsRef<str>>(urls: &[S]) -> Self {
            Self {
                failing: urls.iter().map(|u| u.as_ref().to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(url) {
                return Err(FaceCheckError::FetchError {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(url.as_bytes().to_vec())
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub enum VerifierStep {
        Result(bool, f64),
        Fail,
        Panic,
    }

    /// 每次呼叫播放一步，最後一步會重複
    pub struct StubVerifier {
        steps: Vec<VerifierStep>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl StubVerifier {
        pub fn new(steps: Vec<VerifierStep>) -> Self {
            Self {
                steps,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn always(verified: bool, distance: f64) -> Self {
            Self::new(vec![VerifierStep::Result(verified, distance)])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen_paths(&self) -> Vec<(PathBuf, PathBuf)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FaceVerifier for StubVerifier {
        async fn verify(&self, img1_path: &Path, img2_path: &Path) -> Result<Verification> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((img1_path.to_path_buf(), img2_path.to_path_buf()));

            assert!(img1_path.exists(), "uploaded image missing during verification");
            assert!(img2_path.exists(), "candidate image missing during verification");

            let step = self
                .steps
                .get(call)
                .or_else(|| self.steps.last())
                .copied()
                .unwrap_or(VerifierStep::Fail);

            match step {
                VerifierStep::Result(verified, distance) => Ok(Verification { verified, distance }),
                VerifierStep::Fail => Err(FaceCheckError::VerificationError {
                    message: "Face could not be detected".to_string(),
                }),
                VerifierStep::Panic => panic!("verifier crashed"),
            }
        }
    }
}
