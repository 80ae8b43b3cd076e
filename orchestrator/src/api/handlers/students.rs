use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use orchestrator_core::permission::{Action, ResourceCategory};
use orchestrator_core::school::student::{CreateStudentRequest, Student};
use serde::Serialize;

use crate::api::error::{AppError, ErrorBody};
use crate::api::extract::WriteBody;
use crate::api::handlers::{ensure_class_in_tenant, record_outcome};
use crate::app_state::SharedAppState;
use crate::services::authorization::RequestContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentList {
    pub students: Vec<Student>,
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 200, description = "Students of the tenant", body = StudentList),
    (status = 401, description = "Credential is missing or invalid", body = ErrorBody),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_students_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Students, Action::Read)
        .await?;

    let students = state.store.list_students(ctx.tenant_id()).await;
    Ok(Json(StudentList { students }))
}

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentRequest,
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 201, description = "Student created", body = Student),
    (status = 400, description = "Invalid payload, foreign class or missing tenant header", body = ErrorBody),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_student_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    body: WriteBody<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .reconcile_body(&ctx, body.tenant_id())
        .await?;
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Students, Action::Create)
        .await?;
    let payload = body.into_payload()?;
    payload.validate()?;
    ensure_class_in_tenant(&state, &ctx, payload.class_id).await?;

    let student = payload.into_student(ctx.tenant_id().clone());
    let target_id = student.id.to_string();
    let outcome = state.store.add_student(student).await;
    let student = record_outcome(
        &state.audit,
        &ctx,
        "students:create",
        "students",
        target_id,
        outcome,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(student)))
}
