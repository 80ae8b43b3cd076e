use serde::Deserialize;

pub const DEFAULT_TENANT_HEADER: &str = "x-tenant-id";

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
    /// Header carrying the caller-asserted tenant id.
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
}

fn default_tenant_header() -> String {
    DEFAULT_TENANT_HEADER.to_string()
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:21380".to_string(),
            tenant_header: default_tenant_header(),
        }
    }
}
