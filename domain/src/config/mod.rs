//! Configuration value objects for the domain layer
//!
//! The configuration is read-only data supplied by the caller; loading
//! it from disk is an infrastructure concern.

mod app_config;
pub mod defaults;

pub use app_config::{AppConfig, Group, GroupInfo};
