// Adapters layer: concrete implementations of the domain ports plus request-scoped storage.

pub mod deepface;
pub mod google_search;
pub mod http_fetcher;
pub mod storage;

pub use deepface::DeepFaceClient;
pub use google_search::GoogleImageSearch;
pub use http_fetcher::HttpImageFetcher;
pub use storage::RequestWorkspace;
