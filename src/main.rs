use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting building platform server on {}:{} (entry path {})",
        config.interface.as_deref().unwrap_or("127.0.0.1"),
        config.port,
        config.entry_path()
    );

    let app_state = service::AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Failed to start web server: {e}");
        std::process::exit(1);
    }
}
