use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use orchestrator_core::error::{AuthError, ForbiddenError, MismatchError, TenantError};
use orchestrator_core::school::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// JSON body of every error response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Stable machine readable code, e.g. `tenant_mismatch`.
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error(transparent)]
    Mismatch(#[from] MismatchError),

    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, ErrorBody) {
        let (status, code) = match self {
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::Tenant(TenantError::Missing) => (StatusCode::BAD_REQUEST, "missing_tenant_id"),
            AppError::Tenant(TenantError::Invalid) => (StatusCode::FORBIDDEN, "invalid_tenant"),
            AppError::Tenant(TenantError::Inactive) => (StatusCode::FORBIDDEN, "tenant_inactive"),
            AppError::Tenant(TenantError::Unavailable) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AppError::Mismatch(_) => (StatusCode::FORBIDDEN, "tenant_mismatch"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        // Internal details stay in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let (required_permission, reason) = match self {
            AppError::Forbidden(e) => (
                Some(e.required_permission().to_string()),
                Some(e.reason().as_str().to_string()),
            ),
            _ => (None, None),
        };

        (
            status,
            ErrorBody {
                error: code.to_string(),
                message,
                required_permission,
                reason,
            },
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(format!("{:#}", e))
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::InvalidInput(e.0)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::InternalServerError(detail) = &self {
            error!("Request failed: {}", detail);
        }
        let (status, body) = self.get_error_msg();
        (status, Json(body)).into_response()
    }
}
