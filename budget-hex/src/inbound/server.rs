//! HTTP Server configuration and startup.

use std::{sync::Arc, time::Duration};

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use budget_types::{IdentityVerifier, TransactionRepository};

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::TransactionService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Budget API.
pub struct HttpServer<R: TransactionRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: TransactionRepository> HttpServer<R> {
    /// Creates a new HTTP server with the default rate limit (100 req/min per user).
    pub fn new(service: TransactionService<R>, identity: impl IdentityVerifier) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                identity: Arc::new(identity),
            }),
            rate_limiter: Arc::new(RateLimiterState::default()),
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(
        service: TransactionService<R>,
        identity: impl IdentityVerifier,
        requests_per_minute: u32,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                identity: Arc::new(identity),
            }),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        // Layers run bottom-up: auth first, then the per-user rate limit
        let protected = Router::new()
            .route(
                "/api/transactions",
                get(handlers::find_by_user::<R>).post(handlers::create::<R>),
            )
            .route(
                "/api/transactions/{uid}",
                get(handlers::find_by_uid::<R>)
                    .put(handlers::update::<R>)
                    .delete(handlers::delete::<R>),
            )
            .route_layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<R>,
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .merge(protected)
            .with_state(self.state.clone())
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let sweeper = tokio::spawn(sweep_rate_limiters(self.rate_limiter.clone()));

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();
        served?;

        Ok(())
    }
}

/// Periodically forgets the buckets of idle users.
async fn sweep_rate_limiters(limiter: Arc<RateLimiterState>) {
    let mut interval = tokio::time::interval(limiter.sweep_interval());
    loop {
        interval.tick().await;
        let evicted = limiter.evict_idle();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = limiter.tracked_users(), "evicted idle rate limiters");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
