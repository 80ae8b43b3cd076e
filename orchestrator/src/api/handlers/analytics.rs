use axum::{debug_handler, extract::State, response::IntoResponse, Extension, Json};
use orchestrator_core::permission::{Action, ResourceCategory};

use crate::api::error::{AppError, ErrorBody};
use crate::app_state::SharedAppState;
use crate::services::analytics::{self, RiskReport, TeacherReport};
use crate::services::authorization::RequestContext;

/// Reading or exporting analytics both grant access to the reports.
const ANALYTICS_ACCESS: &[Action] = &[Action::Read, Action::Export];

#[utoipa::path(
    get,
    path = "/api/v1/analytics/risk",
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 200, description = "Students ranked by risk", body = RiskReport),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn risk_report_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_any(&ctx, ResourceCategory::Analytics, ANALYTICS_ACCESS)
        .await?;

    let students = state.store.list_students(ctx.tenant_id()).await;
    Ok(Json(analytics::risk_report(
        &students,
        &state.settings.analytics,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/teachers",
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 200, description = "Activity per teacher", body = TeacherReport),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn teacher_report_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_any(&ctx, ResourceCategory::Analytics, ANALYTICS_ACCESS)
        .await?;

    let classes = state.store.list_classes(ctx.tenant_id()).await;
    let assignments = state.store.list_assignments(ctx.tenant_id()).await;
    Ok(Json(analytics::teacher_report(&classes, &assignments)))
}
