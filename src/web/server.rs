//! Web server for CloudVault.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::auth::{TokenSigner, TokenVerifier};
use crate::config::Config;
use crate::storage::FileStorage;
use crate::Database;

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database, storage: FileStorage) -> Self {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .expect("Invalid web server address");

        let algorithm = config.auth.algorithm();
        let signer = TokenSigner::new(
            &config.auth.jwt_secret,
            algorithm,
            config.auth.token_ttl_minutes,
        );
        let jwt_state = Arc::new(JwtState::new(TokenVerifier::new(
            &config.auth.jwt_secret,
            algorithm,
        )));

        let public_base_url = config
            .server
            .public_base_url
            .clone()
            .unwrap_or_default();

        let app_state = AppState {
            db,
            storage,
            signer,
            public_base_url,
            max_upload_size: (config.storage.max_upload_size_mb as usize) * 1024 * 1024,
        };

        Self {
            addr,
            app_state: Arc::new(app_state),
            jwt_state,
            cors_origins: config.server.cors_origins.clone(),
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the full application router.
    fn build_router(&self) -> axum::Router {
        create_router(
            self.app_state.clone(),
            self.jwt_state.clone(),
            &self.cors_origins,
        )
        .merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(storage_path: &str) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0; // Use random port
        config.auth.jwt_secret = "test-secret-key".to_string();
        config.storage.path = storage_path.to_string();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = create_test_config(dir.path().to_str().unwrap());
        let db = Database::open_in_memory().await.unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let server = WebServer::new(&config, db, storage);
        assert_eq!(server.addr.ip().to_string(), "127.0.0.1");
    }
}
