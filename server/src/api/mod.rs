//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{extract::DefaultBodyLimit, extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::Config;
use crate::relay::{self, TicketRelay};

/// Largest accepted inbound payload.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Relay to the configured chat webhook
    pub relay: Arc<TicketRelay>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, relay: TicketRelay) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        relay::handlers::relay_info,
        relay::handlers::relay_ticket,
    ),
    components(schemas(
        HealthResponse,
        relay::types::TicketEvent,
        relay::types::Ticket,
        relay::types::Person,
        relay::types::Organization,
        relay::types::Priority,
        relay::types::TicketSummary,
        relay::types::MessageResponse,
        relay::types::RelayResponse,
        relay::embed::ChatMessage,
        relay::embed::Embed,
        relay::embed::EmbedField,
        relay::embed::EmbedFooter,
    )),
    tags(
        (name = "relay", description = "Ticket webhook relay"),
    ),
)]
pub struct ApiDoc;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Ticket relay
        .route(
            "/discord",
            get(relay::handlers::relay_info).post(relay::handlers::relay_ticket),
        )
        // API documentation
        .merge(api_docs())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize, utoipa::ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// Whether a destination webhook is configured
    webhook_configured: bool,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
)]
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        webhook_configured: state.config.has_webhook(),
    })
}

/// API documentation routes.
fn api_docs() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
