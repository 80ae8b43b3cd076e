use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use orchestrator_core::permission::{Action, ResourceCategory};
use orchestrator_core::school::assignment::{
    Assignment, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::{AppError, ErrorBody};
use crate::api::extract::WriteBody;
use crate::api::handlers::{ensure_class_in_tenant, record_outcome};
use crate::app_state::SharedAppState;
use crate::services::authorization::RequestContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AssignmentList {
    pub assignments: Vec<Assignment>,
}

async fn find_assignment(
    state: &SharedAppState,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<Assignment, AppError> {
    state
        .store
        .get_assignment(ctx.tenant_id(), id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("assignment {id}")))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 200, description = "Assignments of the tenant", body = AssignmentList),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_assignments_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Assignments, Action::Read)
        .await?;

    let assignments = state.store.list_assignments(ctx.tenant_id()).await;
    Ok(Json(AssignmentList { assignments }))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignmentRequest,
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 201, description = "Assignment created, owned by the caller", body = Assignment),
    (status = 400, description = "Invalid payload or class of another tenant", body = ErrorBody),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_assignment_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    body: WriteBody<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .reconcile_body(&ctx, body.tenant_id())
        .await?;
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Assignments, Action::Create)
        .await?;
    let payload = body.into_payload()?;
    payload.validate()?;
    ensure_class_in_tenant(&state, &ctx, payload.class_id).await?;

    let assignment = payload.into_assignment(
        ctx.tenant_id().clone(),
        ctx.identity().user_id().clone(),
    );
    let target_id = assignment.id.to_string();
    let outcome = state.store.save_assignment(assignment).await;
    let assignment = record_outcome(
        &state.audit,
        &ctx,
        "assignments:create",
        "assignments",
        target_id,
        outcome,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/assignments/{id}",
    request_body = UpdateAssignmentRequest,
    params(
        ("id" = Uuid, Path, description = "Assignment id"),
        ("X-Tenant-ID" = String, Header, description = "Tenant identifier"),
    ),
    responses(
    (status = 200, description = "Updated assignment", body = Assignment),
    (status = 400, description = "Invalid payload", body = ErrorBody),
    (status = 403, description = "Not permitted or not the owner", body = ErrorBody),
    (status = 404, description = "No such assignment in this tenant", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn update_assignment_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    body: WriteBody<UpdateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .reconcile_body(&ctx, body.tenant_id())
        .await?;
    state
        .auth_service
        .require_grant(&ctx, ResourceCategory::Assignments, Action::Update)
        .await?;

    let mut assignment = find_assignment(&state, &ctx, id).await?;
    state
        .auth_service
        .require_owned_or_elevated(
            &ctx,
            ResourceCategory::Assignments,
            Action::Update,
            &id.to_string(),
            &assignment.owner_id,
        )
        .await?;
    let payload = body.into_payload()?;
    payload.validate()?;

    assignment.apply(payload);
    let outcome = state.store.update_assignment(assignment).await;
    let assignment = record_outcome(
        &state.audit,
        &ctx,
        "assignments:update",
        "assignments",
        id.to_string(),
        outcome,
    )
    .await?;

    Ok(Json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment id"),
        ("X-Tenant-ID" = String, Header, description = "Tenant identifier"),
    ),
    responses(
    (status = 204, description = "Assignment deleted"),
    (status = 403, description = "Not permitted or not the owner", body = ErrorBody),
    (status = 404, description = "No such assignment in this tenant", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn delete_assignment_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_grant(&ctx, ResourceCategory::Assignments, Action::Delete)
        .await?;

    let assignment = find_assignment(&state, &ctx, id).await?;
    state
        .auth_service
        .require_owned_or_elevated(
            &ctx,
            ResourceCategory::Assignments,
            Action::Delete,
            &id.to_string(),
            &assignment.owner_id,
        )
        .await?;

    let outcome = state.store.remove_assignment(ctx.tenant_id(), id).await;
    record_outcome(
        &state.audit,
        &ctx,
        "assignments:delete",
        "assignments",
        id.to_string(),
        outcome,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/validate",
    params(
        ("id" = Uuid, Path, description = "Assignment id"),
        ("X-Tenant-ID" = String, Header, description = "Tenant identifier"),
    ),
    responses(
    (status = 200, description = "Validated assignment", body = Assignment),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    (status = 404, description = "No such assignment in this tenant", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn validate_assignment_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Assignments, Action::Validate)
        .await?;

    let mut assignment = find_assignment(&state, &ctx, id).await?;
    assignment.mark_validated(ctx.identity().user_id().clone());
    let outcome = state.store.update_assignment(assignment).await;
    let assignment = record_outcome(
        &state.audit,
        &ctx,
        "assignments:validate",
        "assignments",
        id.to_string(),
        outcome,
    )
    .await?;

    Ok(Json(assignment))
}
