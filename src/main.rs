//! Cloud Community - Main Application Entry Point
//!
//! This is a REST API server for a community social service. It provides
//! endpoints for user accounts (signup, JWT login with refresh sessions),
//! community posts, comments, and likes.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: JWT access tokens + peppered bcrypt passwords
//! - **Documentation**: Swagger UI at `/docs` (utoipa)
//! - **Format**: JSON requests/responses
//!
//! # Run Modes
//!
//! - `cloud-community` - start the HTTP server
//! - `cloud-community seed` - insert the fixture test accounts and exit
//! - `cloud-community genkey` - print a fresh 32-byte hex secret and exit
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod pagination;
mod router;
mod seed;
mod services;
mod state;
mod validation;

use tracing_subscriber::EnvFilter;

use crate::{services::auth_service, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mode = std::env::args().nth(1);

    // genkey needs no configuration: it mints the secrets the .env wants
    if mode.as_deref() == Some("genkey") {
        println!("{}", auth_service::random_hex_token());
        return Ok(());
    }

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    match mode.as_deref() {
        Some("seed") => {
            seed::run(&pool, &config).await?;
            return Ok(());
        }
        Some(other) => {
            anyhow::bail!("unknown command {other:?} (expected: seed, genkey, or no argument)");
        }
        None => {}
    }

    let server_port = config.server_port;
    let app = router::build(AppState::new(pool, config));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}, docs at http://127.0.0.1:{server_port}/docs");

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
