use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod services;

use auth::rate_limit::RateLimiter;
use config::Config;
use services::{groq::GroqClient, tts::TtsClient};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimiter,
    pub llm: GroqClient,
    pub tts: TtsClient,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let llm = GroqClient::from_config(&config)?;
        let tts = TtsClient::from_config(&config)?;
        Ok(Self {
            db,
            config: Arc::new(config),
            rate_limiter: RateLimiter::default(),
            llm,
            tts,
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the full router. Auth routes read the peer address, so serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/daily-insight", get(handlers::analysis::daily_insight))
        .route("/api/tts", post(handlers::tts::speak))
        .merge(auth_routes);

    // Saved to the journal only when the caller is signed in
    let analysis_routes = Router::new()
        .route("/api/analyze", post(handlers::analysis::analyze))
        .route("/api/analyze-voice", post(handlers::analysis::analyze_voice))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::optional_auth,
        ));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        .route("/api/streak", get(handlers::journal::get_streak))
        .route("/api/calendar-data", get(handlers::journal::get_calendar_data))
        .route("/api/history", get(handlers::journal::list_history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(analysis_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}
