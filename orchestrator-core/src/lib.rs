pub mod audit;
pub mod error;
pub mod identity;
pub mod permission;
pub mod school;
pub mod settings;
pub mod tenant;
