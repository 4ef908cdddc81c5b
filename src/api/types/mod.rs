//! Shared request/response types for the HTTP layer

pub mod error;
pub mod json;
pub mod user;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse};
pub use json::Json;
pub use user::{DoctorResponse, UserResponse};
