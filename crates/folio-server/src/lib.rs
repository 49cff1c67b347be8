//! HTTP server for folio sites.
//!
//! Serves pages rendered by `folio-site` from memory:
//! - `/` serves the `home` page
//! - `/{page}` serves the other configured top-level pages
//! - `/posts/{*post}` serves posts
//! - legacy slugs are permanently redirected to `/posts{path}`
//! - everything else gets the configured 404 page with status 404
//!
//! Every HTML response carries `Cache-Control: max-age=86400`; bodies are
//! gzip-compressed when the client accepts it.

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

pub use error::ServerError;
pub use state::SiteContent;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Create the router serving `content`.
#[must_use]
pub fn router(content: SiteContent) -> axum::Router {
    app::create_router(Arc::new(AppState::new(content)))
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn run_server(config: &ServerConfig, content: SiteContent) -> Result<(), ServerError> {
    let pages = content.pages.len();
    let app = router(content);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })?;
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, pages, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
