//! Orchestrator library
//!
//! The binary is a thin CLI over these modules; the router and app state are
//! public so integration tests can drive the full HTTP stack.

pub mod api;
pub mod app_state;
pub mod http;
pub mod init_telemetry;
pub mod services;
pub mod settings;
pub mod store;

pub use app_state::AppState;
