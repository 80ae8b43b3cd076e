pub mod analytics;
pub mod audit;
pub mod authorization;
pub mod tenant;
pub mod token;

pub use authorization::AuthorizationService;
