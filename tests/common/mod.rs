//! Common test infrastructure
//!
//! Builds on-disk data trees shaped like the real song and log datasets, and
//! resolves an `AppConfig` pointing at them.

mod fixtures;

pub use fixtures::*;
