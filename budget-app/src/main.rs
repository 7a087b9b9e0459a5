//! # Budget Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository and identity adapters
//! - Create the transaction service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budget_hex::{TransactionService, inbound::HttpServer};
use budget_repo::{JwtVerifier, build_repo};

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("budget-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,budget_app=debug,budget_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting budget server on port {}", config.port);
    tracing::debug!(
        rate_limit_per_minute = config.rate_limit_per_minute,
        otlp = config.otlp_endpoint.is_some(),
        "configuration loaded"
    );

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Identity provider for bearer tokens
    let mut identity = JwtVerifier::new(&config.jwt_secret);
    if let Some(issuer) = &config.jwt_issuer {
        identity = identity.with_issuer(issuer);
    }
    if let Some(audience) = &config.jwt_audience {
        identity = identity.with_audience(audience);
    }

    // Create the transaction service
    let service = TransactionService::new(repo);

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, identity, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        if let Err(err) = provider.shutdown() {
            tracing::warn!(%err, "failed to flush traces");
        }
    }
    Ok(())
}
