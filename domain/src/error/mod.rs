//! Error taxonomy
//!
//! A single classified error shape ([`PanelError`]) tagged with one of a
//! fixed set of [`ErrorCategory`] values, plus:
//!
//! - [`factories`]: pre-populated errors for recurring situations
//! - [`classify`](classify::classify): wraps raw errors exactly once,
//!   passing already-classified errors through unchanged

pub mod category;
pub mod classify;
pub mod factories;
pub mod panel_error;

pub use category::ErrorCategory;
pub use classify::{category_for, classify, classify_with_context};
pub use panel_error::PanelError;
