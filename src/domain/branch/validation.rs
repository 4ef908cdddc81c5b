//! Branch validation utilities

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BranchValidationError {
    #[error("Branch name, address, and phone are required")]
    MissingFields,

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

impl From<BranchValidationError> for DomainError {
    fn from(err: BranchValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate all fields of a new branch
pub fn validate_new_branch(
    branch_name: &str,
    address: &str,
    phone: &str,
) -> Result<(), BranchValidationError> {
    if [branch_name, address, phone]
        .iter()
        .any(|value| value.trim().is_empty())
    {
        return Err(BranchValidationError::MissingFields);
    }

    Ok(())
}

/// Validate a field supplied in a partial update
pub fn validate_supplied(field: &'static str, value: &str) -> Result<(), BranchValidationError> {
    if value.trim().is_empty() {
        return Err(BranchValidationError::Empty(field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_branch_requires_all_fields() {
        assert!(validate_new_branch("Downtown", "1 Main St", "555-0100").is_ok());
        assert_eq!(
            validate_new_branch("Downtown", "", "555-0100"),
            Err(BranchValidationError::MissingFields)
        );
        assert_eq!(
            validate_new_branch(" ", "1 Main St", "555-0100"),
            Err(BranchValidationError::MissingFields)
        );
    }

    #[test]
    fn test_supplied_field_must_not_be_empty() {
        assert!(validate_supplied("Phone", "555").is_ok());
        assert_eq!(
            validate_supplied("Phone", ""),
            Err(BranchValidationError::Empty("Phone"))
        );
    }
}
