mod api;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod models;
mod photos;
mod schema;
mod store;

use axum::extract::{DefaultBodyLimit, FromRef, MatchedPath};
use axum::http::{header, HeaderValue, Method, Request};
use axum::middleware;
use axum::Router;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenService;
use crate::config::{Config, ConfigError, StorageBackend};
use crate::store::{MemoryStore, PgStore, Store};

/// Headroom on top of the image limit for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub max_upload_bytes: usize,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

fn otlp_providers(
    endpoint: &str,
    service_name: &str,
) -> Result<(SdkTracerProvider, SdkLoggerProvider), ExporterBuildError> {
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((trace_provider, log_provider))
}

/// Initialize telemetry with optional OpenTelemetry export.
/// If OTEL_EXPORTER_OTLP_ENDPOINT is set and reachable, traces and logs are sent
/// to the collector. Otherwise, only console logging is used.
fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return;
    };

    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://");

    // Quick TCP check to see if the collector is up (resolve hostname first)
    let is_reachable = host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false);

    if !is_reachable {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return;
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "potluck-server".to_string());

    match otlp_providers(&endpoint, &service_name) {
        Ok((trace_provider, log_provider)) => {
            let tracer = trace_provider.tracer("potluck-server");
            opentelemetry::global::set_tracer_provider(trace_provider);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .with(OpenTelemetryTracingBridge::new(&log_provider))
                .init();

            tracing::info!(
                "OpenTelemetry enabled, exporting traces and logs to {} as {}",
                endpoint,
                service_name
            );
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
            tracing::warn!("Failed to create OTLP exporters, using console logging only: {}", e);
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState, frontend_origin: HeaderValue) -> Router {
    // Routes that are protected as a whole
    let protected_router = Router::new()
        .merge(api::favorites::router())
        .merge(api::my_recipes::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Recipe writes carry an image, so they get their own body limit
    let recipes_router = api::recipes::router().layer(DefaultBodyLimit::max(
        state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES),
    ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .merge(api::public::router())
        .merge(recipes_router)
        .merge(api::photos::router())
        .merge(protected_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/ping" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] db::DbInitError),

    #[error("FRONTEND_URL {0:?} is not a valid origin")]
    InvalidOrigin(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            Arc::new(PgStore::new(db::create_pool(url)?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let frontend_origin = HeaderValue::from_str(&config.frontend_url)
        .map_err(|_| StartupError::InvalidOrigin(config.frontend_url.clone()))?;

    let state = AppState {
        store,
        tokens: Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl)),
        max_upload_bytes: config.max_upload_bytes,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app(state, frontend_origin)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        match api::openapi().to_pretty_json() {
            Ok(spec) => println!("{}", spec),
            Err(e) => {
                eprintln!("Failed to render OpenAPI spec: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    init_telemetry();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
