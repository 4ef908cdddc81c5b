//! Role entity and related types

use serde::{Deserialize, Serialize};

/// Database identifier of a seeded role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i32);

impl RoleId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of staff roles
///
/// Names are stored uppercase. Parsing with [`RoleName::from_stored`] is
/// case-sensitive, matching the directory's storage rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    Admin,
    Doctor,
    Receptionist,
    Optician,
    Pharmacist,
}

impl RoleName {
    pub const ALL: [RoleName; 5] = [
        RoleName::Admin,
        RoleName::Doctor,
        RoleName::Receptionist,
        RoleName::Optician,
        RoleName::Pharmacist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Doctor => "DOCTOR",
            Self::Receptionist => "RECEPTIONIST",
            Self::Optician => "OPTICIAN",
            Self::Pharmacist => "PHARMACIST",
        }
    }

    /// Description used when seeding the directory
    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "System Administrator",
            Self::Doctor => "Medical Professional",
            Self::Receptionist => "Front Desk Staff",
            Self::Optician => "Eyewear Specialist",
            Self::Pharmacist => "Medication Specialist",
        }
    }

    /// Parse a stored (uppercase) role name
    pub fn from_stored(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self, Self::Doctor)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named permission class, seeded once and never created by the user workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: RoleName,
    description: String,
}

impl Role {
    pub fn new(id: RoleId, name: RoleName, description: impl Into<String>) -> Self {
        Self {
            id,
            name,
            description: description.into(),
        }
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> RoleName {
        self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_round_trip() {
        for role in RoleName::ALL {
            assert_eq!(RoleName::from_stored(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_name_lookup_is_case_sensitive() {
        assert_eq!(RoleName::from_stored("doctor"), None);
        assert_eq!(RoleName::from_stored("Doctor"), None);
        assert_eq!(RoleName::from_stored("NURSE"), None);
    }

    #[test]
    fn test_role_name_serialization() {
        let json = serde_json::to_string(&RoleName::Receptionist).unwrap();
        assert_eq!(json, "\"RECEPTIONIST\"");
    }

    #[test]
    fn test_role_accessors() {
        let role = Role::new(RoleId::new(2), RoleName::Doctor, "Medical Professional");

        assert_eq!(role.id().value(), 2);
        assert!(role.name().is_doctor());
        assert_eq!(role.description(), "Medical Professional");
    }
}
