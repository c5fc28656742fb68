use crate::config::toml_config::{SearchConfig, GOOGLE_API_KEY_ENV, GOOGLE_CX_ENV, MAX_SEARCH_RESULTS};
use crate::domain::ports::ImageSearch;
use crate::utils::error::{FaceCheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 以 Google Custom Search JSON API 實作的圖片搜尋
pub struct GoogleImageSearch {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

impl GoogleImageSearch {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
        })
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let api_key = non_empty(&self.api_key).ok_or_else(|| FaceCheckError::SearchError {
            message: format!("{} is not configured", GOOGLE_API_KEY_ENV),
        })?;
        let engine_id = non_empty(&self.engine_id).ok_or_else(|| FaceCheckError::SearchError {
            message: format!("{} is not configured", GOOGLE_CX_ENV),
        })?;
        Ok((api_key, engine_id))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// reqwest 錯誤會帶上含 API key 的請求網址
fn search_failure(err: reqwest::Error) -> FaceCheckError {
    FaceCheckError::SearchError {
        message: err.without_url().to_string(),
    }
}

fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}

#[async_trait]
impl ImageSearch for GoogleImageSearch {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let (api_key, engine_id) = self.credentials()?;

        if count == 0 {
            return Ok(Vec::new());
        }
        let num = count.min(MAX_SEARCH_RESULTS).to_string();

        tracing::debug!("🔎 Searching images for '{}' (num={})", query, num);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", query),
                ("searchType", "image"),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(search_failure)?;

        let status = response.status();
        tracing::debug!("Search provider response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match provider_message(&body) {
                Some(detail) => format!("provider returned {}: {}", status, detail),
                None => format!("provider returned {}", status),
            };
            return Err(FaceCheckError::SearchError { message });
        }

        let payload: SearchResponse = response.json().await.map_err(search_failure)?;

        let urls: Vec<String> = payload
            .items
            .into_iter()
            .filter_map(|item| item.link)
            .take(count)
            .collect();

        tracing::info!("🔎 Search for '{}' returned {} image URLs", query, urls.len());
        Ok(urls)
    }
}
