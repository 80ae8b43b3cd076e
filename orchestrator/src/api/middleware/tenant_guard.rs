use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{self, HeaderMap},
    middleware::Next,
    response::Response,
};
use orchestrator_core::audit::RequestMetadata;
use orchestrator_core::tenant::TenantId;
use tracing::{debug, warn};

use crate::api::auth_core::authenticate;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Client address and user agent for audit records. The first
/// `x-forwarded-for` hop wins over the socket peer.
pub fn request_metadata(req: &Request) -> RequestMetadata {
    let forwarded = header_str(req.headers(), "x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    RequestMetadata {
        ip: forwarded.or(peer),
        user_agent: header_str(req.headers(), http::header::USER_AGENT.as_str())
            .map(str::to_string),
    }
}

/// Establishes the request context for tenant-scoped routes.
///
/// Order: tenant header presence, credential, tenant resolution,
/// reconciliation. Handlers behind this layer only run with a
/// [`RequestContext`](crate::services::authorization::RequestContext)
/// in the request extensions.
pub async fn tenant_guard(
    State(state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let tenant_id = TenantId::parse(header_str(
        req.headers(),
        &state.settings.api.tenant_header,
    ))
    .inspect_err(|_| {
        warn!(
            "Missing tenant header '{}' | {} {}",
            state.settings.api.tenant_header,
            req.method(),
            req.uri()
        );
    })?;

    let identity = authenticate(
        &state.tokens,
        header_str(req.headers(), http::header::AUTHORIZATION.as_str()),
    )
    .inspect_err(|e| {
        warn!(
            "Authentication failed for {} {}: {} | user_agent: {:?}",
            req.method(),
            req.uri(),
            e,
            header_str(req.headers(), http::header::USER_AGENT.as_str()).unwrap_or("unknown")
        );
    })?;

    let tenant = state.tenants.resolve_id(&tenant_id).await?;

    let metadata = request_metadata(&req);
    let context = state
        .auth_service
        .reconcile(identity, tenant, metadata)
        .await?;

    debug!(
        "Request context: user '{}' ({}) in tenant '{}'",
        context.identity().user_id(),
        context.identity().role(),
        context.tenant_id()
    );
    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
