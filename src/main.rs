use tracing::info;

use cloudvault::{Config, Database, FileStorage, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::from_env()
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = cloudvault::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!("CloudVault - cloud file storage backend");

    let db = match Database::connect(&config.database.url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let storage = match FileStorage::new(&config.storage.path) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!("Failed to initialize file storage: {e}");
            std::process::exit(1);
        }
    };
    info!("File storage initialized at: {}", config.storage.path);

    let server = WebServer::new(&config, db, storage);
    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {e}");
        std::process::exit(1);
    }
}
