use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceCheckError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Image search failed: {message}")]
    SearchError { message: String },

    #[error("Failed to download {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("Face verification failed: {message}")]
    VerificationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Storage,
    Upstream,
}

impl FaceCheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FaceCheckError::HttpError(_) | FaceCheckError::FetchError { .. } => {
                ErrorCategory::Network
            }
            FaceCheckError::IoError(_) => ErrorCategory::Storage,
            FaceCheckError::ConfigError { .. }
            | FaceCheckError::ConfigValidationError { .. }
            | FaceCheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FaceCheckError::SearchError { .. } | FaceCheckError::VerificationError { .. } => {
                ErrorCategory::Upstream
            }
        }
    }
}

/// 在產生任何副作用前就拒絕的請求
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientInputError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Invalid file type")]
    InvalidFileType,
}

pub type Result<T> = std::result::Result<T, FaceCheckError>;
