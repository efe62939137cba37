//! REST API handlers for serve mode.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tablegen_core::IntrospectError;
use tablegen_render::TemplateKind;

use super::AppState;
use crate::generate::{GenerateError, GenerateRequest, GenerateResponse};

/// Build the API router with all endpoints.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/generate/download", post(download))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (_, response) = run_generation(&state, payload).await?;
    Ok(Json(response))
}

/// The generated scaffold alone, as an HTML file attachment.
async fn download(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (kind, response) = run_generation(&state, payload).await?;
    let file_name = tablegen_render::output_file_name(&response.table_name, kind);
    let disposition = format!("attachment; filename=\"{file_name}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        response.generated_code,
    ))
}

async fn run_generation(
    state: &AppState,
    payload: GenerateRequest,
) -> Result<(TemplateKind, GenerateResponse), (StatusCode, String)> {
    let request = state.complete_request(payload);
    request
        .validate()
        .map_err(|e| (status_for(&e), e.to_string()))?;
    let kind = request.template_type;

    // Introspection blocks on the database; keep it off the async workers.
    let generator = Arc::clone(&state.generator);
    let response = tokio::task::spawn_blocking(move || generator(&request))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %e, "generation failed");
            (status_for(&e), e.to_string())
        })?;

    Ok((kind, response))
}

fn status_for(error: &GenerateError) -> StatusCode {
    match error {
        GenerateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GenerateError::NoColumns(_) => StatusCode::NOT_FOUND,
        GenerateError::Introspect(IntrospectError::Query(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        GenerateError::Introspect(IntrospectError::Connection(_)) => StatusCode::BAD_GATEWAY,
    }
}
