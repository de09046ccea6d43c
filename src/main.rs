use anyhow::Context;

use luma_api::{app, config::Config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luma_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;
    tracing::info!(day_boundary = ?config.day_boundary, "Configuration loaded");

    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    db::MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    let addr = config.listen_addr();
    let state = AppState::new(pool, config)?;
    state.rate_limiter.spawn_sweeper();

    let router = app(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
