use crate::config::Config;
use crate::fetch::Fetcher;
use crate::metadata::TmdbClient;
use crate::pipeline::Resolver;
use crate::skiptimes::SkipTimesClient;
use crate::streams::StreamsClient;
use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    middleware,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod guard;
pub mod request_id;
pub mod routes;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub resolver: Arc<Resolver>,
    pub skiptimes: Arc<SkipTimesClient>,
}

impl AppContext {
    /// Build every upstream client on one shared connection pool.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config).context("Failed to build HTTP client")?;
        let resolver = Resolver::new(
            TmdbClient::new(fetcher.clone(), &config.tmdb),
            StreamsClient::new(fetcher.clone(), &config.streams),
        );
        let skiptimes = SkipTimesClient::new(fetcher, &config.skiptimes);

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            skiptimes: Arc::new(skiptimes),
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config.server.cors_origins);

    // Everything except skip times is subject to the domain allowlist
    let guarded = routes::api_routes();
    let guarded = if ctx.config.server.allowed_domains.is_empty() {
        guarded
    } else {
        tracing::info!(
            domains = ?ctx.config.server.allowed_domains,
            "Restricting API to allowed domains"
        );
        guarded.layer(middleware::from_fn_with_state(
            ctx.clone(),
            guard::allowed_domain_middleware,
        ))
    };

    guarded
        .merge(routes::public_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id::request_id_middleware))
                .layer(cors),
        )
        .with_state(ctx)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(AppContext::new(config)?);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
