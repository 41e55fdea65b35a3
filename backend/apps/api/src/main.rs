//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use academy::{
    AcademyAppState, AcademyConfig, PgAcademyRepository, PrintPdfRenderer, account_router,
    course_router, progress_router, purchase_router,
};
use anyhow::Context;
use auth::application::config::SameSite;
use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Read a base64-encoded 32-byte secret
fn secret_from_env(name: &str) -> anyhow::Result<Option<[u8; 32]>> {
    let Ok(encoded) = env::var(name) else {
        return Ok(None);
    };

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .with_context(|| format!("{name} is not valid base64"))?;
    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("{name} must decode to exactly 32 bytes"))?;

    Ok(Some(secret))
}

fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::with_random_secret()
    };

    match secret_from_env("AUTH_SESSION_SECRET")? {
        Some(secret) => config.session_secret = secret,
        None if !cfg!(debug_assertions) => {
            anyhow::bail!("AUTH_SESSION_SECRET must be set in production")
        }
        None => tracing::warn!("AUTH_SESSION_SECRET not set, sessions end on restart"),
    }

    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    if let Ok(same_site) = env::var("COOKIE_SAME_SITE") {
        config.cookie_same_site = same_site
            .parse::<SameSite>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(config)
}

fn academy_config_from_env() -> anyhow::Result<AcademyConfig> {
    let mut config = AcademyConfig::default();

    match secret_from_env("PURCHASE_WEBHOOK_SECRET")? {
        Some(secret) => config.webhook_secret = Some(secret),
        None if !cfg!(debug_assertions) => {
            anyhow::bail!("PURCHASE_WEBHOOK_SECRET must be set in production")
        }
        None => tracing::warn!("PURCHASE_WEBHOOK_SECRET not set, accepting unsigned webhooks"),
    }

    if let Ok(currency) = env::var("PURCHASE_CURRENCY") {
        config.currency = currency.trim().to_uppercase();
    }
    if let Ok(brand) = env::var("CERTIFICATE_BRAND") {
        config.certificate_brand = brand;
    }

    Ok(config)
}

/// `CERTIFICATE_FONTS`: comma-separated TrueType files used when the bundled
/// faces lack a glyph (Devanagari, CJK, ...).
fn certificate_renderer_from_env() -> anyhow::Result<PrintPdfRenderer> {
    let renderer = PrintPdfRenderer::new()?;

    let Ok(paths) = env::var("CERTIFICATE_FONTS") else {
        return Ok(renderer);
    };

    let mut fonts = Vec::new();
    for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read certificate font {path}"))?;
        fonts.push(bytes);
    }
    tracing::info!(fallback_fonts = fonts.len(), "Certificate fonts loaded");

    Ok(renderer.with_fallback_fonts(fonts)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,academy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    if let Err(e) = auth_repo.cleanup_expired().await {
        tracing::warn!(
            error = %e,
            "Auth session cleanup failed, continuing anyway"
        );
    }

    let auth_config = auth_config_from_env()?;
    let academy_config = academy_config_from_env()?;
    tracing::info!(
        currency = %academy_config.currency,
        brand = %academy_config.certificate_brand,
        "Academy configured"
    );

    let guard = AuthMiddlewareState::new(Arc::new(auth_repo.clone()), Arc::new(auth_config.clone()));
    let academy_store = Arc::new(PgAcademyRepository::new(pool.clone()));
    let academy_state = AcademyAppState::new(
        academy_store.clone(),
        academy_config,
        certificate_renderer_from_env()?,
    );

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let user_routes = auth_router(auth_repo, auth_config)
        .merge(account_router(academy_store, guard.clone()));

    let app = Router::new()
        .nest("/api/v1/user", user_routes)
        .nest(
            "/api/v1/course",
            course_router(academy_state.clone(), guard.clone()),
        )
        .nest(
            "/api/v1/purchase",
            purchase_router(academy_state.clone(), guard.clone()),
        )
        .nest("/api/v1/progress", progress_router(academy_state, guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
