//! User validation utilities

use thiserror::Error;

use crate::domain::role::RoleName;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Doctor profile requires license number and specialization")]
    MissingDoctorDetails,

    #[error("Role {0} cannot carry a doctor profile")]
    UnexpectedDoctorProfile(RoleName),
}

/// Minimum length for passwords set through an update
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate that a required text field is present and not blank
pub fn validate_required(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::Required(field));
    }

    Ok(())
}

/// Validate a manually chosen password
///
/// Generated temporary passwords do not go through this check.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert!(validate_required("Full name", "Jane Roe").is_ok());
        assert_eq!(
            validate_required("Full name", ""),
            Err(UserValidationError::Required("Full name"))
        );
        assert_eq!(
            validate_required("Email", "   "),
            Err(UserValidationError::Required("Email"))
        );
    }

    #[test]
    fn test_password_minimum_length() {
        assert_eq!(
            validate_password("12345"),
            Err(UserValidationError::PasswordTooShort(6))
        );
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // five characters, more than six bytes
        assert!(validate_password("ééééé").is_err());
        assert!(validate_password("éééééé").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UserValidationError::PasswordTooShort(6).to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            UserValidationError::UnexpectedDoctorProfile(RoleName::Optician).to_string(),
            "Role OPTICIAN cannot carry a doctor profile"
        );
    }
}
