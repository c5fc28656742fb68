//! HTTP 介面：上傳表單、`/verify` 與健康檢查

pub mod handlers;
pub mod pages;

use crate::core::verify::VerificationEngine;
use crate::utils::error::{ClientInputError, FaceCheckError};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub engine: VerificationEngine,
}

impl AppState {
    pub fn new(engine: VerificationEngine) -> Self {
        Self { engine }
    }
}

/// 轉換成 `{"error": ...}` JSON 回應的錯誤
#[derive(Debug)]
pub enum ApiError {
    Client(ClientInputError),
    Multipart(MultipartError),
    Internal(FaceCheckError),
}

impl From<ClientInputError> for ApiError {
    fn from(err: ClientInputError) -> Self {
        ApiError::Client(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl From<FaceCheckError> for ApiError {
    fn from(err: FaceCheckError) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Client(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Multipart(err) => (err.status(), err.body_text()),
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/verify", post(handlers::verify_person))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
