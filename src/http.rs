use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::io::ReaderStream;

use crate::acquire::{self, AcquireOutcome};
use crate::core::context::AppContext;
use crate::error::AcquireError;
use crate::registry::ArtifactDescriptor;

/// The service's HTTP surface. Routing and rendering only; all semantics
/// live in the acquisition pipeline and the registry store.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/models", get(list_models))
        .route("/pending", get(list_pending))
        .route("/model/:alias", get(fetch_model))
        .route("/acquire/:content_hash/:alias", post(acquire_model))
        .with_state(ctx)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelSummary {
    alias: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum AcquireResponse {
    Present { model: ArtifactDescriptor },
    Pending,
    Committed { model: ArtifactDescriptor },
}

async fn list_models(State(ctx): State<AppContext>) -> Response {
    match ctx.registry().list_all() {
        Ok(descriptors) => {
            let summaries: Vec<ModelSummary> = descriptors
                .into_iter()
                .map(|descriptor| ModelSummary {
                    alias: descriptor.alias,
                    name: descriptor.display_name,
                })
                .collect();
            Json(summaries).into_response()
        }
        Err(error) => {
            tracing::error!("Registry scan failed: {error:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn list_pending(State(ctx): State<AppContext>) -> Json<Vec<String>> {
    Json(ctx.admission().snapshot())
}

async fn fetch_model(State(ctx): State<AppContext>, Path(alias): Path<String>) -> Response {
    let descriptor = match ctx.registry().get(&alias) {
        Ok(Some(descriptor)) => descriptor,
        Ok(None) => return (StatusCode::NOT_FOUND, "no such model").into_response(),
        Err(error) => {
            tracing::error!("Registry lookup for {alias} failed: {error:?}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let path = descriptor.data_path(ctx.registry().root());
    match tokio::fs::File::open(&path).await {
        Ok(file) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            Body::from_stream(ReaderStream::new(file)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Failed to open {}: {error:?}", path.display());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn acquire_model(
    State(ctx): State<AppContext>,
    Path((content_hash, alias)): Path<(String, String)>,
) -> Response {
    match acquire::acquire(&ctx, &alias, &content_hash).await {
        Ok(AcquireOutcome::Present(model)) => {
            Json(AcquireResponse::Present { model }).into_response()
        }
        Ok(AcquireOutcome::AlreadyInFlight) => {
            (StatusCode::CONFLICT, Json(AcquireResponse::Pending)).into_response()
        }
        Ok(AcquireOutcome::Committed(model)) => {
            Json(AcquireResponse::Committed { model }).into_response()
        }
        Ok(AcquireOutcome::Rejected(rejection)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, rejection.to_string()).into_response()
        }
        Err(error) => {
            let status = match &error {
                AcquireError::CapacityExhausted => StatusCode::SERVICE_UNAVAILABLE,
                AcquireError::Network(_) => StatusCode::BAD_GATEWAY,
                AcquireError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::error!("Acquisition of {alias} failed: {error:?}");
            (status, error.to_string()).into_response()
        }
    }
}
