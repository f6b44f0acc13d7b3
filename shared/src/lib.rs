//! Recipe API Shared Library
//!
//! This crate contains the request/response types and input validation
//! used by the backend and its API clients.

pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;
pub use validation::{normalize_email, ValidationError};
