use crate::config::toml_config::VerifierConfig;
use crate::domain::model::Verification;
use crate::domain::ports::FaceVerifier;
use crate::utils::error::{FaceCheckError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// DeepFace 相容 `/verify` 端點的客戶端
///
/// 圖片以 base64 data URI 內嵌傳送，比對服務不需要存取本服務的檔案系統
pub struct DeepFaceClient {
    client: Client,
    verify_url: String,
    model_name: Option<String>,
    detector_backend: Option<String>,
    distance_metric: Option<String>,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    img1_path: String,
    img2_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detector_backend: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_metric: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    verified: bool,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct VerifyErrorBody {
    error: String,
}

impl DeepFaceClient {
    pub fn new(config: &VerifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            verify_url: format!("{}/verify", config.endpoint.trim_end_matches('/')),
            model_name: config.model_name.clone(),
            detector_backend: config.detector_backend.clone(),
            distance_metric: config.distance_metric.clone(),
        })
    }
}

fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

async fn encode_image(path: &Path) -> Result<String> {
    let data = tokio::fs::read(path).await?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(data)
    ))
}

fn verification_failure(message: impl Into<String>) -> FaceCheckError {
    FaceCheckError::VerificationError {
        message: message.into(),
    }
}

#[async_trait]
impl FaceVerifier for DeepFaceClient {
    async fn verify(&self, img1_path: &Path, img2_path: &Path) -> Result<Verification> {
        let request = VerifyRequest {
            img1_path: encode_image(img1_path).await?,
            img2_path: encode_image(img2_path).await?,
            model_name: self.model_name.as_deref(),
            detector_backend: self.detector_backend.as_deref(),
            distance_metric: self.distance_metric.as_deref(),
        };

        tracing::debug!(
            "🧑 Verifying {} against {}",
            img1_path.display(),
            img2_path.display()
        );

        let response = self
            .client
            .post(&self.verify_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| verification_failure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| verification_failure(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<VerifyErrorBody>(&body) {
                Ok(detail) => format!("verifier returned {}: {}", status, detail.error),
                Err(_) => format!("verifier returned {}", status),
            };
            return Err(verification_failure(message));
        }

        let result: VerifyResponse = serde_json::from_str(&body)
            .map_err(|e| verification_failure(format!("unexpected verifier response: {}", e)))?;

        Ok(Verification {
            verified: result.verified,
            distance: result.distance,
        })
    }
}
