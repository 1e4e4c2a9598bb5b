//! Route handlers for the web dashboard

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use estate_core::PropertyId;
use estate_dashboard::ChartId;
use estate_listview::{SortKey, TypeFilter};
use estate_session::{PropertyCard, Session};
use serde::Deserialize;
use std::sync::Arc;

use crate::state::{AppState, LoadState};
use crate::templates;

/// `?type=&sort=` of the property list
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Resolve against the configured defaults; blank values count as absent.
    fn resolve(&self, state: &AppState) -> Result<(TypeFilter, SortKey), String> {
        let filter = match self.property_type.as_deref().map(str::trim) {
            None | Some("") => state.default_filter(),
            Some(raw) => raw.parse().map_err(|e| format!("{e}"))?,
        };
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => state.default_sort(),
            Some(raw) => raw.parse().map_err(|e| format!("{e}"))?,
        };
        Ok((filter, sort))
    }
}

// ============== Page Handlers ==============

/// Portfolio overview
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = match state.current().await {
        LoadState::Ready(snapshot) => snapshot,
        other => return load_error_page(&state, other),
    };

    let charts: Vec<_> = ChartId::ALL
        .iter()
        .filter_map(|id| snapshot.model.chart(*id))
        .map(|chart| (chart, snapshot.chart_markup(chart.id)))
        .collect();

    tracing::debug!(session = %snapshot.session.id(), "rendering dashboard");
    Html(templates::dashboard_html(&snapshot.model, &charts)).into_response()
}

/// Property grid
pub async fn properties(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let session = match state.current().await {
        LoadState::Ready(snapshot) => snapshot.session.clone(),
        other => return load_error_page(&state, other),
    };

    let (filter, sort) = match params.resolve(&state) {
        Ok(resolved) => resolved,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Html(templates::bad_request_html(&message)))
                .into_response()
        }
    };

    let view = session.list_view(filter, sort);
    let cards: Vec<PropertyCard> = view
        .visible()
        .iter()
        .map(|p| PropertyCard::from_property(p))
        .collect();

    Html(templates::properties_html(
        &cards,
        &session.types(),
        view.filter(),
        view.sort(),
    ))
    .into_response()
}

/// Property detail; unknown ids get a non-fatal notice
pub async fn property_detail(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let session = match state.current().await {
        LoadState::Ready(snapshot) => snapshot.session.clone(),
        other => return load_error_page(&state, other),
    };

    match lookup(&session, &raw_id) {
        Some(detail) => Html(templates::detail_html(&detail)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(templates::not_found_html(&raw_id))).into_response(),
    }
}

/// Retry action: load the document again, then show the overview
pub async fn reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.reload().await {
        LoadState::Ready(snapshot) => {
            tracing::info!(session = %snapshot.session.id(), "portfolio reloaded");
        }
        LoadState::Failed(message) => {
            tracing::warn!(%message, "reload failed");
        }
        LoadState::Pending => {}
    }
    Redirect::to("/")
}

/// CSS stylesheet
pub async fn style_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        templates::STYLE_CSS,
    )
}

fn lookup(session: &Session, raw_id: &str) -> Option<estate_session::PropertyDetail> {
    let id: PropertyId = raw_id.parse().ok()?;
    session.detail(id)
}

fn load_error_page(state: &AppState, load: LoadState) -> Response {
    let message = match load {
        LoadState::Failed(message) => message,
        _ => "An unknown error occurred while loading data.".to_string(),
    };
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(templates::error_html(&message, &state.origin())),
    )
        .into_response()
}

// ============== API Handlers ==============

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.source_stats().await;
    Json(serde_json::json!({
        "status": "healthy",
        "service": "estate-web",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "source": {
            "origin": state.origin(),
            "stats": stats,
        }
    }))
}

/// Composed overview as JSON
pub async fn api_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match state.current().await {
        LoadState::Ready(snapshot) => Json(serde_json::json!({
            "session": snapshot.session.info(),
            "dashboard": snapshot.model,
        }))
        .into_response(),
        other => api_load_error(other),
    }
}

/// Filtered, sorted records as JSON
pub async fn api_properties(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let session = match state.current().await {
        LoadState::Ready(snapshot) => snapshot.session.clone(),
        other => return api_load_error(other),
    };

    let (filter, sort) = match params.resolve(&state) {
        Ok(resolved) => resolved,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, &message),
    };

    let view = session.list_view(filter, sort);
    Json(serde_json::json!({
        "filter": view.filter(),
        "sort": view.sort(),
        "count": view.visible().len(),
        "signal": view.signal(),
        "properties": view.visible(),
    }))
    .into_response()
}

/// One record with its formatted detail
pub async fn api_property(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let session = match state.current().await {
        LoadState::Ready(snapshot) => snapshot.session.clone(),
        other => return api_load_error(other),
    };

    let found = raw_id
        .parse::<PropertyId>()
        .ok()
        .and_then(|id| session.find(id));
    match found {
        Some(property) => Json(serde_json::json!({
            "property": property,
            "detail": estate_session::PropertyDetail::from_property(property),
        }))
        .into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            &format!("Property {raw_id} not found"),
        ),
    }
}

fn api_load_error(load: LoadState) -> Response {
    let message = match load {
        LoadState::Failed(message) => message,
        _ => "Data not loaded".to_string(),
    };
    api_error(StatusCode::SERVICE_UNAVAILABLE, &message)
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
