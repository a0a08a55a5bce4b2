//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, AuthService, PasswordHasher, TokenIssuer};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, UserStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub auth: AuthService,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            auth: AuthService::new(store, hasher, Arc::clone(&tokens)),
            tokens,
        }
    }

    /// Build state from configuration, opening the configured store
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = store::connect(&config.database).await?;
        let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
        let tokens = Arc::new(TokenIssuer::from_config(&config.auth));
        Ok(Self::new(store, hasher, tokens))
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config).await?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        store = %config.database.backend,
        "Server listening on {}",
        addr
    );

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/auth/users", get(routes::list_users))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.tokens),
            require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
