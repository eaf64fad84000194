use rthumb::{logger, server, Config, ThumbnailService};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port(),
    );
    logger::log_config_info(&config);

    let service = match ThumbnailService::from_config(&config).await {
        Ok(service) => {
            log::info!("✅ Thumbnail service initialized");
            service
        }
        Err(e) => {
            log::error!("❌ Failed to initialize thumbnail service: {}", e);
            return Err(e.into());
        }
    };

    server::run(config, service).await?;
    Ok(())
}
