use crate::config::toml_config::FetchConfig;
use crate::domain::ports::ImageFetcher;
use crate::utils::error::{FaceCheckError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct HttpImageFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            max_bytes: config.max_image_bytes,
        })
    }

    fn failure(url: &str, message: impl Into<String>) -> FaceCheckError {
        FaceCheckError::FetchError {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        validate_url("image_url", url).map_err(|e| Self::failure(url, e.to_string()))?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::failure(url, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(url, format!("server returned {}", status)));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(Self::failure(
                    url,
                    format!("image is {} bytes, limit is {}", length, self.max_bytes),
                ));
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::failure(url, e.without_url().to_string()))?
        {
            if data.len() + chunk.len() > self.max_bytes {
                return Err(Self::failure(
                    url,
                    format!("image exceeds limit of {} bytes", self.max_bytes),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(Self::failure(url, "empty response body"));
        }

        tracing::debug!("📥 Downloaded {} bytes from {}", data.len(), url);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher(max_image_bytes: usize) -> HttpImageFetcher {
        HttpImageFetcher::new(&FetchConfig {
            max_image_bytes,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_image_bytes() {
        let server = MockServer::start();
        let image_mock = server.mock(|when, then| {
            when.method(GET).path("/images/1.jpg");
            then.status(200)
                .header("Content-Type", "image/jpeg")
                .body(b"\xff\xd8\xff\xe0jpeg-bytes".as_slice());
        });

        let data = fetcher(1024)
            .fetch_image(&server.url("/images/1.jpg"))
            .await
            .unwrap();

        image_mock.assert();
        assert_eq!(data, b"\xff\xd8\xff\xe0jpeg-bytes");
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.jpg");
            then.status(404);
        });

        let url = server.url("/missing.jpg");
        let err = fetcher(1024).fetch_image(&url).await.unwrap_err();

        match err {
            FaceCheckError::FetchError { url: failed, message } => {
                assert_eq!(failed, url);
                assert!(message.contains("404"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/huge.jpg");
            then.status(200).body(vec![0u8; 64]);
        });

        let err = fetcher(16)
            .fetch_image(&server.url("/huge.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, FaceCheckError::FetchError { .. }));
    }

    /// 以 chunked 編碼回應、不帶 Content-Length 的伺服器
    async fn serve_chunked(chunks: Vec<Vec<u8>>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;

            let mut response =
                b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nTransfer-Encoding: chunked\r\n\r\n"
                    .to_vec();
            for chunk in chunks {
                response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
                response.extend_from_slice(&chunk);
                response.extend_from_slice(b"\r\n");
            }
            response.extend_from_slice(b"0\r\n\r\n");
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/stream.jpg", addr)
    }

    #[tokio::test]
    async fn test_streamed_image_without_length_is_capped() {
        let url = serve_chunked(vec![vec![1u8; 10], vec![2u8; 10], vec![3u8; 10]]).await;

        let err = fetcher(16).fetch_image(&url).await.unwrap_err();

        match err {
            FaceCheckError::FetchError { url: failed, message } => {
                assert_eq!(failed, url);
                assert!(message.contains("exceeds limit of 16 bytes"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_streamed_image_within_limit_is_read_fully() {
        let url = serve_chunked(vec![b"jpeg-".to_vec(), b"bytes".to_vec()]).await;

        let data = fetcher(16).fetch_image(&url).await.unwrap();

        assert_eq!(data, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty.jpg");
            then.status(200);
        });

        let err = fetcher(1024)
            .fetch_image(&server.url("/empty.jpg"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("empty response body"));
    }

    #[tokio::test]
    async fn test_non_http_url_is_rejected() {
        let err = fetcher(1024)
            .fetch_image("file:///etc/passwd")
            .await
            .unwrap_err();

        assert!(matches!(err, FaceCheckError::FetchError { .. }));
    }
}
