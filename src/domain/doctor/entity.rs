//! Doctor profile entity

use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Medical credentials attached 1:1 to a DOCTOR user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    user_id: UserId,
    license_number: String,
    specialization: String,
}

impl DoctorProfile {
    pub fn new(
        user_id: UserId,
        license_number: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            license_number: license_number.into(),
            specialization: specialization.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn specialization(&self) -> &str {
        &self.specialization
    }
}

/// Field changes for an upsert; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorProfileChanges {
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

impl DoctorProfileChanges {
    /// Build changes from request input, treating empty strings as not supplied
    pub fn from_input(license_number: Option<String>, specialization: Option<String>) -> Self {
        Self {
            license_number: license_number.filter(|v| !v.trim().is_empty()),
            specialization: specialization.filter(|v| !v.trim().is_empty()),
        }
    }

    /// Both fields present, as required when a doctor account is first created
    pub fn is_complete(&self) -> bool {
        self.license_number.is_some() && self.specialization.is_some()
    }

    /// Merge onto an existing profile, or create one with empty placeholders
    pub fn apply(self, user_id: &UserId, existing: Option<&DoctorProfile>) -> DoctorProfile {
        let license_number = self
            .license_number
            .or_else(|| existing.map(|p| p.license_number.clone()))
            .unwrap_or_default();
        let specialization = self
            .specialization
            .or_else(|| existing.map(|p| p.specialization.clone()))
            .unwrap_or_default();

        DoctorProfile::new(user_id.clone(), license_number, specialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(user_id: &UserId) -> DoctorProfile {
        DoctorProfile::new(user_id.clone(), "LIC-001", "Retina")
    }

    #[test]
    fn test_apply_creates_with_placeholders() {
        let user_id = UserId::generate();
        let profile = DoctorProfileChanges::default().apply(&user_id, None);

        assert_eq!(profile.user_id(), &user_id);
        assert_eq!(profile.license_number(), "");
        assert_eq!(profile.specialization(), "");
    }

    #[test]
    fn test_apply_keeps_unsupplied_fields() {
        let user_id = UserId::generate();
        let current = existing(&user_id);
        let changes = DoctorProfileChanges {
            license_number: None,
            specialization: Some("Glaucoma".to_string()),
        };

        let profile = changes.apply(&user_id, Some(&current));

        assert_eq!(profile.license_number(), "LIC-001");
        assert_eq!(profile.specialization(), "Glaucoma");
    }

    #[test]
    fn test_from_input_drops_empty_values() {
        let changes = DoctorProfileChanges::from_input(Some("".to_string()), Some("Cornea".to_string()));

        assert!(changes.license_number.is_none());
        assert_eq!(changes.specialization.as_deref(), Some("Cornea"));
        assert!(!changes.is_complete());
    }
}
