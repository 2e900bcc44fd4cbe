use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    error::{ServerError, StudioError},
    service::TransformService,
    styles::ParameterInfo,
};

use super::protocol::{HttpRequest, HttpResponse};

pub const TRANSFORM_PATH: &str = "/api/transform";
pub const HEALTH_PATH: &str = "/api/health";

/// Shared state handed to every connection
pub struct AppState {
    pub service: TransformService,
    pub allow_origin: String,
}

#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    /// Base64-encoded PNG or JPEG
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    /// Base64-encoded JPEG
    pub transformed_image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub style: String,
    pub description: String,
    pub parameters: Vec<ParameterInfo>,
}

/// Turn an error into a JSON error body with the matching status
pub fn error_response(err: &StudioError) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Rejected request: {}", err);
    }
    HttpResponse::json(
        status,
        &ErrorResponse {
            error: err.user_message(),
        },
    )
}

fn error_with_status(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::json(status, &ErrorResponse { error: message })
}

/// Attach the CORS headers every response carries
pub fn with_cors(response: HttpResponse, allow_origin: &str) -> HttpResponse {
    response
        .with_header("Access-Control-Allow-Origin", allow_origin)
        .with_header("Access-Control-Allow-Headers", "content-type")
        .with_header("Access-Control-Allow-Methods", "POST, GET, OPTIONS")
}

/// Route a parsed request
pub async fn handle(request: HttpRequest, state: Arc<AppState>) -> HttpResponse {
    if request.method == Method::OPTIONS {
        return HttpResponse::new(StatusCode::NO_CONTENT);
    }

    let path = request.path.clone();
    match path.as_str() {
        TRANSFORM_PATH if request.method == Method::POST => transform(request, state).await,
        HEALTH_PATH if request.method == Method::GET => health(&state.service),
        TRANSFORM_PATH | HEALTH_PATH => error_with_status(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("{} is not allowed on {}", request.method, request.path),
        ),
        _ => error_with_status(
            StatusCode::NOT_FOUND,
            format!("no route for {}", request.path),
        ),
    }
}

fn health(service: &TransformService) -> HttpResponse {
    HttpResponse::json(
        StatusCode::OK,
        &HealthResponse {
            status: "ok".to_string(),
            style: service.style_name().to_string(),
            description: service.style_description().to_string(),
            parameters: service.style_metadata().parameters,
        },
    )
}

async fn transform(request: HttpRequest, state: Arc<AppState>) -> HttpResponse {
    let payload: TransformRequest = match serde_json::from_slice(&request.body) {
        Ok(payload) => payload,
        Err(e) => {
            return error_response(&StudioError::Server(ServerError::BadRequest {
                reason: format!("expected a JSON body with an \"image\" field: {}", e),
            }))
        }
    };

    // The filter is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        state.service.transform_base64(&payload.image)
    })
    .await;

    match result {
        Ok(Ok(transformed_image)) => {
            HttpResponse::json(StatusCode::OK, &TransformResponse { transformed_image })
        }
        Ok(Err(err)) => error_response(&err),
        Err(join_error) => error_response(&StudioError::generic(format!(
            "transform task failed: {}",
            join_error
        ))),
    }
}
