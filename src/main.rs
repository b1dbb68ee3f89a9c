use tracing::info;

use docdrop::web::WebServer;
use docdrop::Config;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> docdrop::Result<()> {
    let mut config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = docdrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        docdrop::logging::init_console_only(&config.logging.level);
    }

    config.validate()?;

    info!("docdrop - document drop service");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    WebServer::new(&config)?.run().await?;

    Ok(())
}
