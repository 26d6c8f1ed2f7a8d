use std::env;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use dottie_core::{pattern_info, Pattern, PatternInfo, RawAnswers};
use dottie_observability::AppMetrics;
use dottie_service::{AssessmentService, ServiceError};
use dottie_storage::Store;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const MAX_USER_ID_LEN: usize = 128;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub database_url: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            database_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("DOTTIE_BIND").unwrap_or(defaults.bind),
            database_url: env::var("DOTTIE_DATABASE_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            max_body_bytes: env::var("DOTTIE_MAX_BODY_BYTES")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub service: AssessmentService<Store>,
    pub metrics: Arc<AppMetrics>,
    pub storage_backend: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    storage: &'static str,
    metrics: dottie_observability::MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct CreateAssessmentRequest {
    user_id: String,
    answers: RawAnswers,
}

#[derive(Debug, Deserialize)]
struct ReplaceAssessmentRequest {
    answers: RawAnswers,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    user_id: String,
}

pub async fn build_app(config: &ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let store = Store::from_optional_url(config.database_url.as_deref()).await?;
    let storage_backend = store.backend();

    let service = AssessmentService::new(Arc::new(store), metrics.clone())?;

    let state = ApiState {
        service,
        metrics,
        storage_backend,
    };

    Ok(build_router(state, config.max_body_bytes))
}

pub fn build_router(state: ApiState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/patterns", get(patterns_list))
        .route("/v1/patterns/:pattern", get(pattern_get))
        .route("/v1/assessments/classify", post(assessment_classify))
        .route(
            "/v1/assessments",
            get(assessments_list).post(assessment_create),
        )
        .route(
            "/v1/assessments/:id",
            get(assessment_get)
                .put(assessment_replace)
                .delete(assessment_delete),
        )
        .route("/v1/assessments/:id/chat_seed", get(assessment_chat_seed))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        storage: state.storage_backend,
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn patterns_list() -> impl IntoResponse {
    let patterns = Pattern::ALL
        .into_iter()
        .map(pattern_info)
        .collect::<Vec<&PatternInfo>>();
    (StatusCode::OK, Json(patterns))
}

async fn pattern_get(Path(pattern): Path<String>) -> impl IntoResponse {
    let Some(pattern) = Pattern::parse(&pattern) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "unknown_pattern",
            format!("no pattern named `{}`", pattern),
        );
    };

    (StatusCode::OK, Json(pattern_info(pattern))).into_response()
}

async fn assessment_classify(
    State(state): State<ApiState>,
    Json(answers): Json<RawAnswers>,
) -> impl IntoResponse {
    let assessment = state.service.assess(&answers);
    let info = pattern_info(assessment.result.pattern);

    (
        StatusCode::OK,
        Json(json!({
            "title": info.title,
            "description": info.description,
            "result": assessment.result,
            "classification": assessment.classification,
        })),
    )
}

async fn assessment_create(
    State(state): State<ApiState>,
    Json(request): Json<CreateAssessmentRequest>,
) -> impl IntoResponse {
    let user_id = match validate_user_id(&request.user_id) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    match state.service.save(user_id, &request.answers).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn assessments_list(
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let user_id = match validate_user_id(&query.user_id) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    match state.service.history(user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn assessment_get(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get(&id).await {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn assessment_replace(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ReplaceAssessmentRequest>,
) -> impl IntoResponse {
    match state.service.replace(&id, &request.answers).await {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn assessment_delete(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn assessment_chat_seed(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.chat_seed(&id).await {
        Ok(message) => (StatusCode::OK, Json(json!({ "message": message }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn validate_user_id(raw: &str) -> Result<&str, Response> {
    let user_id = raw.trim();
    if user_id.is_empty() || user_id.len() > MAX_USER_ID_LEN {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_user_id",
            format!("user_id must be 1-{} characters", MAX_USER_ID_LEN),
        ));
    }
    Ok(user_id)
}

fn service_error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::Invalid(error) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_assessment",
            error.to_string(),
        ),
        ServiceError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("assessment `{}` not found", id),
        ),
        ServiceError::Storage(error) => {
            tracing::error!(error = ?error, "assessment storage failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "assessment storage is unavailable".to_string(),
            )
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}
