//! # API Shared
//!
//! Shared utilities and definitions for the ICU APIs.
//!
//! Contains:
//! - Wire types with OpenAPI schemas (`types` module)
//! - Shared services like `HealthService`
//! - Staff verification used to guard ward endpoints
//!
//! Used by `api-rest` for common functionality.

pub mod auth;
pub mod health;
pub mod types;

pub use auth::{verify_line_user, AuthError};
pub use health::HealthService;
pub use types::*;
