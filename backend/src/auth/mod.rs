//! Authentication module
//!
//! Provides JWT-based token authentication with argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{extract_token, AuthUser, StaffUser};
pub use password::PasswordService;
