//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use auth::{PgUserRepository, SeedSuperAdminUseCase, TokenCodec, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use contact::{ContactConfig, PgContactRepository, contact_router};
use feedback::{FeedbackConfig, PgFeedbackRepository, feedback_router};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,contact=info,feedback=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = config.auth;
    let tokens = TokenCodec::new(&auth_config);
    let user_store = PgUserRepository::new(pool.clone());

    // Bootstrap superadmin; errors here should not prevent server startup
    let seed = SeedSuperAdminUseCase::new(
        Arc::new(user_store.clone()),
        Arc::new(auth_config.clone()),
    );
    match seed.execute().await {
        Ok(Some(user)) => {
            tracing::info!(user_id = %user.id, "Superadmin account created");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Superadmin seeding failed, continuing anyway"
            );
        }
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
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
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_router(user_store, auth_config))
        .nest(
            "/api/contacts",
            contact_router(PgContactRepository::new(pool.clone()), ContactConfig::default()),
        )
        .nest(
            "/api/feedback",
            feedback_router(PgFeedbackRepository::new(pool), FeedbackConfig::default()),
        )
        .layer(middleware::from_fn_with_state(
            tokens,
            auth::middleware::authenticate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.server_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
