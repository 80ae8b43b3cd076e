use std::marker::PhantomData;

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::AppError;

/// JSON body of a tenant-scoped write.
///
/// The optional `tenant_id` member is read before the payload is
/// deserialized, so a foreign tenant is reported as a mismatch even when the
/// rest of the body is incomplete. Rejections from the JSON extractor become
/// `invalid_input` errors.
pub struct WriteBody<T> {
    tenant_id: Option<String>,
    value: Value,
    payload: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> WriteBody<T> {
    /// Tenant id carried in the body, if any. A non-string value is kept in
    /// its JSON form and never matches a tenant.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn into_payload(self) -> Result<T, AppError> {
        serde_json::from_value(self.value).map_err(|e| AppError::InvalidInput(e.to_string()))
    }
}

impl<T, S> FromRequest<S> for WriteBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        if !value.is_object() {
            return Err(AppError::InvalidInput(
                "request body must be a JSON object".to_string(),
            ));
        }

        let tenant_id = match value.get("tenant_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(tenant_id)) => Some(tenant_id.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            tenant_id,
            value,
            payload: PhantomData,
        })
    }
}
