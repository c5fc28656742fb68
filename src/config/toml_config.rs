use crate::utils::error::{FaceCheckError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const GOOGLE_CX_ENV: &str = "GOOGLE_CX";

/// Custom Search 每次最多回傳 10 筆結果
pub const MAX_SEARCH_RESULTS: usize = 10;

const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub verifier: VerifierConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub result_count: usize,
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: None,
            engine_id: None,
            result_count: 5,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub max_image_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            max_image_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub endpoint: String,
    pub model_name: Option<String>,
    pub detector_backend: Option<String>,
    pub distance_metric: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5005".to_string(),
            model_name: None,
            detector_backend: None,
            distance_metric: None,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub scraped_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            scraped_dir: "scraped_images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FaceCheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FaceCheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FaceCheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 未在檔案中設定的搜尋憑證改從環境變數取得
    pub fn apply_env_overrides(&mut self) {
        if is_unset(&self.search.api_key) {
            self.search.api_key = std::env::var(GOOGLE_API_KEY_ENV).ok();
        }
        if is_unset(&self.search.engine_id) {
            self.search.engine_id = std::env::var(GOOGLE_CX_ENV).ok();
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("search.endpoint", &self.search.endpoint)?;
        validation::validate_url("verifier.endpoint", &self.verifier.endpoint)?;

        validation::validate_range(
            "search.result_count",
            self.search.result_count,
            1,
            MAX_SEARCH_RESULTS,
        )?;

        validation::validate_positive_number(
            "server.max_upload_bytes",
            self.server.max_upload_bytes,
            1,
        )?;
        validation::validate_positive_number(
            "fetch.max_image_bytes",
            self.fetch.max_image_bytes,
            1,
        )?;

        validation::validate_path("storage.upload_dir", &self.storage.upload_dir)?;
        validation::validate_path("storage.scraped_dir", &self.storage.scraped_dir)?;

        Ok(())
    }
}

// 替換後仍殘留的 ${VAR} 視為未設定
fn is_unset(value: &Option<String>) -> bool {
    match value {
        None => true,
        Some(v) => v.trim().is_empty() || v.starts_with("${"),
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
