use super::{pages, ApiError, AppState};
use crate::domain::model::UploadedImage;
use crate::utils::error::ClientInputError;
use crate::utils::validation::{image_extension, is_allowed_image, is_blank};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// 尚未驗證的 `/verify` 表單
#[derive(Debug, Default)]
pub struct VerifyForm {
    pub file: Option<FilePart>,
    pub query: Option<String>,
}

#[derive(Debug)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct VerifyRequest {
    pub image: UploadedImage,
    pub query: String,
}

impl VerifyForm {
    /// 依固定順序檢查，回傳第一個失敗的項目
    pub fn validate(self) -> Result<VerifyRequest, ClientInputError> {
        let file = self.file.ok_or(ClientInputError::MissingFile)?;

        if file.filename.is_empty() || file.bytes.is_empty() {
            return Err(ClientInputError::EmptyFilename);
        }

        let query = match self.query {
            Some(query) if !is_blank(&query) => query.trim().to_string(),
            _ => return Err(ClientInputError::EmptyQuery),
        };

        if !is_allowed_image(&file.filename) {
            return Err(ClientInputError::InvalidFileType);
        }
        let extension = image_extension(&file.filename).ok_or(ClientInputError::InvalidFileType)?;

        Ok(VerifyRequest {
            image: UploadedImage {
                filename: file.filename,
                extension,
                bytes: file.bytes,
            },
            query,
        })
    }
}

/// 讀取 `file` 與 `query` 欄位，其他欄位忽略
pub async fn read_verify_form(mut multipart: Multipart) -> Result<VerifyForm, ApiError> {
    let mut form = VerifyForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" if form.file.is_none() => {
                // 沒有 filename 屬性的欄位不算上傳檔案
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await?;
                form.file = Some(FilePart {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "query" if form.query.is_none() => {
                form.query = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn home() -> Html<&'static str> {
    Html(pages::INDEX_PAGE)
}

/// POST /verify - 比對上傳照片與搜尋到的圖片
pub async fn verify_person(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, ApiError> {
    // 非 multipart 的請求等同沒有上傳檔案
    let multipart = multipart.map_err(|rejection| {
        tracing::info!("Rejected /verify request: {}", rejection.body_text());
        ClientInputError::MissingFile
    })?;
    let form = read_verify_form(multipart).await?;

    let request = form.validate().map_err(|e| {
        tracing::info!("Rejected /verify request: {}", e);
        e
    })?;

    let matches = state
        .engine
        .run(&request.image, &request.query)
        .await
        .map_err(|e| {
            tracing::error!("❌ Verification failed: {} (Category: {:?})", e, e.category());
            e
        })?;

    Ok(Html(pages::results_page(&request.query, &matches)))
}

#[derive(Serialize)]
struct HealthStatus {
    status: String,
}

pub async fn health_check() -> impl IntoResponse {
    let health = HealthStatus {
        status: "ok".to_string(),
    };
    (StatusCode::OK, Json(health))
}
