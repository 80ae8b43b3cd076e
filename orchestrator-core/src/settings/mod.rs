pub mod analytics;
pub mod api_server;
pub mod audit;
pub mod auth;
pub mod tenants;
