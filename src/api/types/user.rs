//! User representation returned by the API

use serde::Serialize;

use crate::domain::{DoctorProfile, RoleName, User};

/// User as exposed over HTTP; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role_id: i32,
    pub role_name: RoleName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub license_number: String,
    pub specialization: String,
}

impl From<&DoctorProfile> for DoctorResponse {
    fn from(profile: &DoctorProfile) -> Self {
        Self {
            license_number: profile.license_number().to_string(),
            specialization: profile.specialization().to_string(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            full_name: user.full_name().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            role_id: user.role_id().value(),
            role_name: user.role_name(),
            doctor: user.doctor_profile().map(DoctorResponse::from),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoleId, UserId};

    #[test]
    fn test_doctor_response_shape() {
        let id = UserId::generate();
        let user = User::new(
            id.clone(),
            "Dr. Ada",
            "ada",
            "ada@example.com",
            "secret-hash",
            &Role::new(RoleId::new(2), RoleName::Doctor, "Medical Professional"),
            Some(DoctorProfile::new(id, "LIC-42", "Glaucoma")),
        )
        .unwrap();

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["fullName"], "Dr. Ada");
        assert_eq!(json["roleName"], "DOCTOR");
        assert_eq!(json["doctor"]["licenseNumber"], "LIC-42");
        assert_eq!(json["doctor"]["specialization"], "Glaucoma");
        assert!(!json.to_string().contains("secret-hash"));
    }

    #[test]
    fn test_non_doctor_omits_profile() {
        let user = User::new(
            UserId::generate(),
            "Sam Desk",
            "sam",
            "sam@example.com",
            "hash",
            &Role::new(RoleId::new(3), RoleName::Receptionist, "Front Desk Staff"),
            None,
        )
        .unwrap();

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["roleName"], "RECEPTIONIST");
        assert!(json.get("doctor").is_none());
    }
}
