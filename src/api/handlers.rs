use crate::application::{
    AuthQueryParams, CertificationService, ErrorResponse, InitializeParams, LinkResponse,
    MutualViewParams,
};
use crate::domain::errors::DomainError;
use crate::ports::GatewayTransport;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info};

/// 应用状态
pub struct AppState<T: GatewayTransport> {
    pub certification_service: Arc<CertificationService<T>>,
}

impl<T: GatewayTransport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            certification_service: self.certification_service.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(kind: &str, e: DomainError) -> ApiError {
    let status = match e {
        DomainError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        DomainError::GatewayError { .. } | DomainError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ if e.is_retryable() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse::new(kind.to_string(), e.to_string())),
    )
}

/// 发起认证
pub async fn start_certification<T: GatewayTransport + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<InitializeParams>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received certification request: {}", request.transaction_id);

    state
        .certification_service
        .start_certification(request)
        .await
        .map(|session| (StatusCode::CREATED, Json(session)).into_response())
        .map_err(|e| {
            error!("Certification start error: {}", e);
            error_response("CERTIFICATION_ERROR", e)
        })
}

/// 查询认证结果
pub async fn query_certification<T: GatewayTransport + 'static>(
    State(state): State<AppState<T>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received certification query: {}", session_id);

    state
        .certification_service
        .query_certification(&session_id)
        .await
        .map(|result| (StatusCode::OK, Json(result)).into_response())
        .map_err(|e| {
            error!("Certification query error: {}", e);
            error_response("QUERY_ERROR", e)
        })
}

/// 授权信息查询深链
pub async fn auth_query_link<T: GatewayTransport + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<AuthQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .certification_service
        .auth_query_link(request)
        .map(|url| (StatusCode::OK, Json(LinkResponse { url })).into_response())
        .map_err(|e| {
            error!("Auth query link error: {}", e);
            error_response("LINK_ERROR", e)
        })
}

/// 互看授权申请深链
pub async fn mutual_view_link<T: GatewayTransport + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<MutualViewParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .certification_service
        .mutual_view_link(request)
        .map(|url| (StatusCode::OK, Json(LinkResponse { url })).into_response())
        .map_err(|e| {
            error!("Mutual view link error: {}", e);
            error_response("LINK_ERROR", e)
        })
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
