use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use orchestrator_core::permission::{Action, ResourceCategory};
use orchestrator_core::school::class::{Class, CreateClassRequest};
use serde::Serialize;

use crate::api::error::{AppError, ErrorBody};
use crate::api::extract::WriteBody;
use crate::api::handlers::record_outcome;
use crate::app_state::SharedAppState;
use crate::services::authorization::RequestContext;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClassList {
    pub classes: Vec<Class>,
}

#[utoipa::path(
    get,
    path = "/api/v1/classes",
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 200, description = "Classes of the tenant", body = ClassList),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn list_classes_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Classes, Action::Read)
        .await?;

    let classes = state.store.list_classes(ctx.tenant_id()).await;
    Ok(Json(ClassList { classes }))
}

#[utoipa::path(
    post,
    path = "/api/v1/classes",
    request_body = CreateClassRequest,
    params(("X-Tenant-ID" = String, Header, description = "Tenant identifier")),
    responses(
    (status = 201, description = "Class created", body = Class),
    (status = 400, description = "Invalid payload or missing tenant header", body = ErrorBody),
    (status = 403, description = "Tenant or permission check failed", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[debug_handler]
pub async fn create_class_handler(
    State(state): State<SharedAppState>,
    Extension(ctx): Extension<RequestContext>,
    body: WriteBody<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .reconcile_body(&ctx, body.tenant_id())
        .await?;
    state
        .auth_service
        .require_permission(&ctx, ResourceCategory::Classes, Action::Create)
        .await?;
    let payload = body.into_payload()?;
    payload.validate()?;

    let class = payload.into_class(ctx.tenant_id().clone());
    let target_id = class.id.to_string();
    let outcome = state.store.add_class(class).await;
    let class = record_outcome(
        &state.audit,
        &ctx,
        "classes:create",
        "classes",
        target_id,
        outcome,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(class)))
}
