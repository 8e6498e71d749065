//! Context loading infrastructure
//!
//! This module provides the local implementation of the
//! [`ContextLoaderPort`] trait defined in the application layer.
//!
//! # Components
//!
//! - [`LocalContextLoader`] - Reads instructions and context documents from disk
//!
//! [`ContextLoaderPort`]: panel_application::ContextLoaderPort

mod loader;

pub use loader::LocalContextLoader;
