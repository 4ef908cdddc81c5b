//! Authentication infrastructure module
//!
//! This module provides JWT session tokens for staff login.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
