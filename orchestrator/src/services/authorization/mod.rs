//! Role based access control and tenant reconciliation.
//!
//! The compiled permission table in `orchestrator_core::permission` is the
//! single source of capabilities. At startup it is loaded into a casbin
//! enforcer, which answers every check at request time. Every denial is
//! written to the audit trail before the error reaches the caller.

pub mod casbin;
pub mod context;
pub mod reconcile;
pub mod service;


pub use context::RequestContext;
pub use service::AuthorizationService;
