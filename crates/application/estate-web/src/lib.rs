//! Estate portfolio web dashboard
//!
//! Server-rendered pages over a loaded [`estate_session::Session`]:
//!
//! - **Overview** (`/`): metric cards, six charts, distribution details
//! - **Properties** (`/properties`): card grid with type filter and sort order
//! - **Detail** (`/properties/:id`): every available field of one record
//!
//! Charts are drawn as inline SVG by [`charts::SvgBackend`], so pages work
//! without client-side scripting. A failed load renders the error view with
//! a retry action that posts to `/reload`.

pub mod charts;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, LoadState, Snapshot};

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(handlers::index))
        .route("/properties", get(handlers::properties))
        .route("/properties/:id", get(handlers::property_detail))
        .route("/reload", post(handlers::reload))
        .route("/static/style.css", get(handlers::style_css));

    let api = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard", get(handlers::api_dashboard))
        .route("/api/properties", get(handlers::api_properties))
        .route("/api/properties/:id", get(handlers::api_property));

    Router::new()
        .merge(pages)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Estate dashboard listening on http://{}", addr);

    axum::serve(listener, app).await
}
