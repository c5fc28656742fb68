use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "facecheck")]
#[command(about = "Compare an uploaded face against image search results")]
pub struct CliArgs {
    /// TOML 配置檔路徑
    #[arg(short, long)]
    pub config: Option<String>,

    /// 覆蓋配置中的 server.host
    #[arg(long)]
    pub host: Option<String>,

    /// 覆蓋配置中的 server.port
    #[arg(long)]
    pub port: Option<u16>,

    /// 啟用詳細輸出
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// 載入配置：檔案 > 環境變數 > 預設值，最後套用命令列覆蓋
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        config.apply_env_overrides();

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}
