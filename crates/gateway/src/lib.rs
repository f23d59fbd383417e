//! API Gateway Library
//!
//! HTTP surface of the auth service: signup, login and the current-user
//! endpoint, wired to the auth core and the user directory in-process.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use auth_core::build_authenticator;
use user_directory::{Database, UserStore};

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the application with its middleware stack.
pub fn build_app(state: AppState) -> Router {
    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

/// Connect to the user store and run the HTTP server.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let directory = Arc::new(UserStore::new(db.get_connection()));
    let auth_service = Arc::new(build_authenticator(&config.auth, directory));

    let state = AppState::new(auth_service, db);
    let app = build_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
