#![allow(clippy::must_use_candidate)]

pub mod demo;

use std::net::SocketAddr;

use axum::Router;
use errmap_config::Config;
use tower_http::trace::TraceLayer;

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 3000);

/// Demo server with the error handler installed on its routes
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or the health
    /// path is already taken by a demo route
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let health = &config.server.health;
        if health.enabled && demo::ROUTES.contains(&health.path.as_str()) {
            anyhow::bail!("server.health.path collides with a demo route: {}", health.path);
        }

        let listen_address = config.server.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS);
        let mappings = demo::mappings();
        tracing::debug!(rules = mappings.len(), "installing error mappings");

        let mut app = errmap_core::install(demo::router(), mappings);

        // Added after install, so never remapped
        if health.enabled {
            app = app.route(&health.path, axum::routing::get(demo::health));
        }

        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests until `shutdown` is cancelled
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;
    use http::StatusCode;
    use tower::ServiceExt;

    use super::*;

    async fn status_of(config: Config, path: &str) -> StatusCode {
        let router = Server::new(&config).unwrap().into_router();
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[test]
    fn defaults_to_port_3000() {
        let server = Server::new(&Config::default()).unwrap();
        assert_eq!(server.listen_address(), SocketAddr::from(([0, 0, 0, 0], 3000)));
    }

    #[test]
    fn uses_configured_listen_address() {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 8080)));
        let server = Server::new(&config).unwrap();
        assert_eq!(server.listen_address().port(), 8080);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = Config::default();
        config.server.health.path = "health".to_owned();
        assert!(Server::new(&config).is_err());
    }

    #[test]
    fn rejects_health_path_colliding_with_demo_route() {
        for path in ["/ping", "/boom", "/items/{id}"] {
            let mut config = Config::default();
            config.server.health.path = path.to_owned();

            let err = Server::new(&config).err().expect("collision must be rejected");
            assert!(err.to_string().contains("server.health.path"), "{path}: {err}");
        }
    }

    #[test]
    fn disabled_health_path_may_shadow_demo_route() {
        let mut config = Config::default();
        config.server.health.enabled = false;
        config.server.health.path = "/ping".to_owned();
        assert!(Server::new(&config).is_ok());
    }

    #[tokio::test]
    async fn health_route_follows_config() {
        assert_eq!(status_of(Config::default(), "/health").await, StatusCode::OK);

        let mut config = Config::default();
        config.server.health.enabled = false;
        assert_eq!(status_of(config, "/health").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn custom_health_path() {
        let mut config = Config::default();
        config.server.health.path = "/ready".to_owned();
        assert_eq!(status_of(config, "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn demo_routes_are_mapped() {
        assert_eq!(status_of(Config::default(), "/ping").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(Config::default(), "/items/abc").await, StatusCode::BAD_REQUEST);
    }
}
