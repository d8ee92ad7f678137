mod page;
mod view;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use trendlens_core::AppConfig;
use trendlens_db::{close_store, connect_store, health_check, PoolConfig, QueryCache};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: QueryCache,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    request_id: String,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/refresh", post(refresh))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// One full render: open the store, assemble the view through the cache,
/// release the store, emit the page. A connection failure short-circuits to
/// a single error banner; per-panel failures inside `build_dashboard` do not
/// abort the render and the close still runs.
async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let pool = match connect_store(&state.config.store_path, PoolConfig::from_env()).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "store connection failed");
            return Html(page::render_connection_error(
                &state.config.topic,
                &e.to_string(),
            ));
        }
    };

    let view = view::build_dashboard(&pool, &state.cache, &state.config).await;
    close_store(pool).await;

    Html(page::render(&view))
}

/// "Refresh Data": drop every memoized snapshot, then send the browser back
/// to `/` so the next render recomputes everything from the store.
async fn refresh(State(state): State<AppState>) -> Redirect {
    state.cache.clear().await;
    tracing::info!("query cache cleared by refresh");
    Redirect::to("/")
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match connect_store(&state.config.store_path, PoolConfig::from_env()).await {
        Ok(pool) => {
            let result = health_check(&pool).await;
            close_store(pool).await;
            match result {
                Ok(()) => (
                    StatusCode::OK,
                    Json(HealthResponse {
                        status: "ok",
                        store: "ok",
                        request_id: req_id.0,
                    }),
                ),
                Err(e) => {
                    tracing::warn!(error = %e, "health check: store unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(HealthResponse {
                            status: "degraded",
                            store: "unavailable",
                            request_id: req_id.0,
                        }),
                    )
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    store: "unreachable",
                    request_id: req_id.0,
                }),
            )
        }
    }
}
