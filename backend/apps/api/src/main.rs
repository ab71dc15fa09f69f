//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::PgAuthRepository;
use auth::application::config::AuthConfig;
use auth::application::notify::{LogOnlyNotifier, WelcomeNotifier};
use auth::domain::repository::SessionRepository;
use auth::infra::smtp::{MailerConfig, SmtpNotifier};
use auth::presentation::router::auth_router;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use shop::PgShopRepository;
use shop::application::config::ShopConfig;
use shop::presentation::router::{shop_api_router, shop_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,shop=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to exactly 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig::new(secret)
    };
    let auth_config_shared = Arc::new(auth_config.clone());

    // Welcome notifier: SMTP when configured, log-only otherwise
    let notifier: Arc<dyn WelcomeNotifier> = match smtp_config_from_env() {
        Some(config) => match SmtpNotifier::new(&config) {
            Ok(notifier) => {
                tracing::info!(host = %config.smtp_host, "SMTP notifier configured");
                Arc::new(notifier)
            }
            Err(e) => {
                tracing::warn!(error = %e, "SMTP setup failed, falling back to log-only");
                Arc::new(LogOnlyNotifier)
            }
        },
        None => {
            tracing::info!("SMTP not configured, welcome mails are log-only");
            Arc::new(LogOnlyNotifier)
        }
    };

    let auth_repo = PgAuthRepository::new(pool.clone());
    let shop_repo = PgShopRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

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
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true);

    // Build router: cookie+CSRF surface under /api, bearer surface under /api/v1
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(auth_repo.clone(), auth_config, notifier),
        )
        .nest(
            "/api/shop",
            shop_router(
                shop_repo.clone(),
                auth_repo.clone(),
                ShopConfig::default(),
                auth_config_shared.clone(),
            ),
        )
        .nest(
            "/api/v1/shop",
            shop_api_router(
                shop_repo,
                auth_repo,
                ShopConfig::default(),
                auth_config_shared,
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Read the SMTP relay settings; `None` unless all are present
fn smtp_config_from_env() -> Option<MailerConfig> {
    Some(MailerConfig {
        smtp_host: env::var("SMTP_HOST").ok()?,
        smtp_username: env::var("SMTP_USERNAME").ok()?,
        smtp_password: env::var("SMTP_PASSWORD").ok()?,
        from_address: env::var("SMTP_FROM").ok()?,
    })
}
