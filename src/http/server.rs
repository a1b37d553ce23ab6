//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the view and API handlers
//! - Wire up middleware (tracing, request timeout)
//! - Render fragments statelessly: every request builds its own view, there
//!   is no shared container
//! - Serve until the shutdown future resolves

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::app::{App, ERROR_MARKUP};
use crate::config::AppConfig;
use crate::data::filter::passes_all;
use crate::data::{DataLoader, LocationFilter};
use crate::error::{FetchError, RenderError};
use crate::observability::metrics;
use crate::routing::split_route;
use crate::views::{ViewContext, ViewRegistry};

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<DataLoader>,
    pub registry: Arc<ViewRegistry>,
    pub context: ViewContext,
    pub config: Arc<AppConfig>,
}

/// HTTP front end for an [`App`]'s data and views.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(app: &App) -> Self {
        let controller = app.controller();
        let state = AppState {
            loader: app.loader().clone(),
            registry: Arc::new(controller.registry().clone()),
            context: controller.context().clone(),
            config: Arc::new(app.config().clone()),
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
        Router::new()
            .route("/view", get(default_view_handler))
            .route("/view/{*fragment}", get(view_handler))
            .route("/api/search", get(search_handler))
            .route("/api/locations", get(locations_handler))
            .route("/api/stats", get(stats_handler))
            .route("/api/metadata", get(metadata_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fetch failures reported as JSON.
struct ApiError(FetchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "Data request failed");
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        Self(error)
    }
}

/// `GET /view`: the default route.
async fn default_view_handler(State(state): State<AppState>) -> Response {
    render_fragment(&state, String::new()).await
}

/// `GET /view/<fragment>[?lang=xx]`.
async fn view_handler(
    State(state): State<AppState>,
    Path(mut fragment): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        fragment.push('?');
        fragment.push_str(&query);
    }
    render_fragment(&state, fragment).await
}

async fn render_fragment(state: &AppState, fragment: String) -> Response {
    let default_route = state.config.router.default_route.as_str();
    let path = if fragment.is_empty() {
        default_route
    } else {
        fragment.as_str()
    };
    let (route, params) = split_route(path);
    tracing::debug!(route = %route, params = ?params, "Rendering view");

    let Some(mut view) = state.registry.build(route, &state.context, params) else {
        // Same recovery as the in-app router: go to the default route.
        if route != default_route && state.registry.factory(default_route).is_some() {
            tracing::debug!(route = %route, default = %default_route, "No view for route, redirecting");
            metrics::record_render("unknown", "redirect");
            return Redirect::to(&format!("/view/{default_route}")).into_response();
        }
        metrics::record_render("unknown", "not_found");
        return (StatusCode::NOT_FOUND, Html(ERROR_MARKUP)).into_response();
    };

    match view.render().await {
        Ok(html) => {
            metrics::record_render(route, "ok");
            Html(html).into_response()
        }
        Err(error) => {
            tracing::error!(route = %route, error = %error, "Error rendering view");
            metrics::record_render(route, "error");
            let status = match error {
                RenderError::Fetch(_) => StatusCode::BAD_GATEWAY,
                RenderError::NotFound { .. } => StatusCode::NOT_FOUND,
                RenderError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Html(ERROR_MARKUP)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// `GET /api/search?q=`.
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = params.q.trim();
    if query.chars().count() < state.config.search.min_query_chars {
        return Ok(Json(Vec::<crate::data::SearchResult>::new()).into_response());
    }
    let results = state.loader.search(query).await?;
    Ok(Json(results).into_response())
}

#[derive(Debug, Deserialize)]
struct LocationParams {
    #[serde(default)]
    q: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    filter: String,
}

/// `GET /api/locations?q=&type=&filter=`: the map panel's lookup.
async fn locations_handler(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Response, ApiError> {
    let mut locations = state.loader.search_locations(&params.q).await?;
    if let Some(kind) = params.kind.filter(|k| !k.is_empty() && k != "all") {
        locations.retain(|l| l.str_field("type") == Some(kind.as_str()));
    }
    let filters = LocationFilter::parse_list(&params.filter);
    locations.retain(|l| passes_all(l, &filters));
    Ok(Json(locations).into_response())
}

/// `GET /api/stats`.
async fn stats_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = state.loader.stats().await?;
    Ok(Json(stats).into_response())
}

/// `GET /api/metadata`: configured description plus the dataset's own.
async fn metadata_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let metadata = state.loader.dataset_metadata().await?;
    Ok(Json(metadata).into_response())
}
