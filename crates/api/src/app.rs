use axum::{
    extract::{Request, State},
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        Method,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::gql;
use crate::state::AppState;

/// Build the Axum router with the health endpoint and GraphQL.
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config()
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    Router::new()
        .route("/health", get(health))
        .route("/graphql", post(graphql_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
}

/// Decodes the body, then hands execution, error classification and response
/// assembly to a separate task so this one never waits on resolver work
/// inline.
async fn graphql_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    let (_parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, state.config().max_body_bytes)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?;

    let document = gql::decode(&body_bytes)?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "graphql",
        %request_id,
        operation = document.operation_name.as_deref().unwrap_or("")
    );
    let schema = state.schema().clone();

    let payload = tokio::spawn(async move { gql::run(&schema, document).await }.instrument(span))
        .await?
        .map_err(AppError::Serialization)?;

    let body = serde_json::to_vec(&payload).map_err(AppError::Serialization)?;
    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}

async fn health() -> &'static str {
    "ok"
}
