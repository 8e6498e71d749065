//! Application-level configuration.
//!
//! - [`RunDefaults`]: timeout and output directory used when the caller
//!   does not override them

pub mod run_defaults;

pub use run_defaults::RunDefaults;
