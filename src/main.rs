use clap::Parser;
use facecheck::adapters::{DeepFaceClient, GoogleImageSearch, HttpImageFetcher};
use facecheck::utils::{logger, validation::Validate};
use facecheck::{build_router, AppState, CliArgs, EngineSettings, VerificationEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入配置
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, config.logging.format);

    tracing::info!("Starting facecheck server");
    if args.verbose {
        tracing::debug!("Loaded config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if config.search.api_key.is_none() || config.search.engine_id.is_none() {
        tracing::warn!("🔑 Search credentials are not configured; /verify requests will fail at the search step");
    }

    std::fs::create_dir_all(&config.storage.upload_dir)?;
    std::fs::create_dir_all(&config.storage.scraped_dir)?;

    let engine = VerificationEngine::new(
        Arc::new(GoogleImageSearch::new(&config.search)?),
        Arc::new(HttpImageFetcher::new(&config.fetch)?),
        Arc::new(DeepFaceClient::new(&config.verifier)?),
        EngineSettings::from_config(&config),
    );
    let app = build_router(Arc::new(AppState::new(engine)), config.server.max_upload_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on http://{}", addr);
    tracing::info!("🧑 Face verifier at {}", config.verifier.endpoint);

    axum::serve(listener, app).await?;
    Ok(())
}
