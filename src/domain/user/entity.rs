//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;
use crate::domain::doctor::DoctorProfile;
use crate::domain::role::{Role, RoleId, RoleName};

/// User identifier (UUID v4)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role assignment of a user
///
/// Only the `Doctor` variant carries a profile, so a user has a doctor
/// profile exactly when its role is DOCTOR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "UPPERCASE")]
pub enum StaffRole {
    Admin,
    Doctor(DoctorProfile),
    Receptionist,
    Optician,
    Pharmacist,
}

impl StaffRole {
    /// Pair a role name with its optional profile, rejecting mismatches
    pub fn assign(
        name: RoleName,
        profile: Option<DoctorProfile>,
    ) -> Result<Self, UserValidationError> {
        match (name, profile) {
            (RoleName::Doctor, Some(profile)) => Ok(Self::Doctor(profile)),
            (RoleName::Doctor, None) => Err(UserValidationError::MissingDoctorDetails),
            (other, Some(_)) => Err(UserValidationError::UnexpectedDoctorProfile(other)),
            (RoleName::Admin, None) => Ok(Self::Admin),
            (RoleName::Receptionist, None) => Ok(Self::Receptionist),
            (RoleName::Optician, None) => Ok(Self::Optician),
            (RoleName::Pharmacist, None) => Ok(Self::Pharmacist),
        }
    }

    pub fn name(&self) -> RoleName {
        match self {
            Self::Admin => RoleName::Admin,
            Self::Doctor(_) => RoleName::Doctor,
            Self::Receptionist => RoleName::Receptionist,
            Self::Optician => RoleName::Optician,
            Self::Pharmacist => RoleName::Pharmacist,
        }
    }

    pub fn doctor_profile(&self) -> Option<&DoctorProfile> {
        match self {
            Self::Doctor(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Flat persisted form of a user row
///
/// `role_name` is filled from the role join when reading and ignored on write.
#[derive(Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub role_name: RoleName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role_name", &self.role_name)
            .finish_non_exhaustive()
    }
}

/// Staff account
#[derive(Clone, Serialize)]
pub struct User {
    id: UserId,
    full_name: String,
    username: String,
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    role_id: RoleId,
    role: StaffRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given role assignment
    pub fn new(
        id: UserId,
        full_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: &Role,
        doctor: Option<DoctorProfile>,
    ) -> Result<Self, UserValidationError> {
        let now = Utc::now();

        Ok(Self {
            id,
            full_name: full_name.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role_id: role.id(),
            role: StaffRole::assign(role.name(), doctor)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a user from its stored row and optional doctor profile
    pub fn from_record(
        record: UserRecord,
        doctor: Option<DoctorProfile>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            role: StaffRole::assign(record.role_name, doctor)?,
            id: record.id,
            full_name: record.full_name,
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            role_id: record.role_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            role_id: self.role_id,
            role_name: self.role.name(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn role_name(&self) -> RoleName {
        self.role.name()
    }

    pub fn doctor_profile(&self) -> Option<&DoctorProfile> {
        self.role.doctor_profile()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, StaffRole::Admin)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
        self.touch();
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Move the user to another role; the profile must match the target role
    pub fn assign_role(
        &mut self,
        role: &Role,
        doctor: Option<DoctorProfile>,
    ) -> Result<(), UserValidationError> {
        self.role = StaffRole::assign(role.name(), doctor)?;
        self.role_id = role.id();
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: i32, name: RoleName) -> Role {
        Role::new(RoleId::new(id), name, name.description())
    }

    fn create_test_user(name: RoleName, doctor: Option<DoctorProfile>) -> Result<User, UserValidationError> {
        User::new(
            UserId::generate(),
            "Jane Roe",
            "jroe",
            "jroe@example.com",
            "hashed_password",
            &role(3, name),
            doctor,
        )
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::generate();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert_eq!(
            UserId::parse("not-a-uuid"),
            Err(UserValidationError::InvalidId("not-a-uuid".to_string()))
        );
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user(RoleName::Receptionist, None).unwrap();

        assert_eq!(user.full_name(), "Jane Roe");
        assert_eq!(user.username(), "jroe");
        assert_eq!(user.email(), "jroe@example.com");
        assert_eq!(user.role_name(), RoleName::Receptionist);
        assert_eq!(user.role_id().value(), 3);
        assert!(user.doctor_profile().is_none());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_doctor_requires_profile() {
        let result = create_test_user(RoleName::Doctor, None);
        assert_eq!(result.err(), Some(UserValidationError::MissingDoctorDetails));
    }

    #[test]
    fn test_non_doctor_rejects_profile() {
        let profile = DoctorProfile::new(UserId::generate(), "LIC-1", "Retina");
        let result = create_test_user(RoleName::Pharmacist, Some(profile));

        assert_eq!(
            result.err(),
            Some(UserValidationError::UnexpectedDoctorProfile(RoleName::Pharmacist))
        );
    }

    #[test]
    fn test_assign_role_moves_profile() {
        let id = UserId::generate();
        let profile = DoctorProfile::new(id.clone(), "LIC-1", "Retina");
        let mut user = User::new(
            id,
            "Dr. Who",
            "drwho",
            "who@example.com",
            "hash",
            &role(2, RoleName::Doctor),
            Some(profile),
        )
        .unwrap();

        assert_eq!(user.doctor_profile().unwrap().license_number(), "LIC-1");

        user.assign_role(&role(4, RoleName::Optician), None).unwrap();
        assert_eq!(user.role_name(), RoleName::Optician);
        assert_eq!(user.role_id().value(), 4);
        assert!(user.doctor_profile().is_none());
    }

    #[test]
    fn test_record_round_trip_preserves_timestamps() {
        let user = create_test_user(RoleName::Admin, None).unwrap();
        let record = user.to_record();

        let restored = User::from_record(record, None).unwrap();
        assert_eq!(restored.id(), user.id());
        assert_eq!(restored.created_at(), user.created_at());
        assert_eq!(restored.password_hash(), "hashed_password");
        assert!(restored.is_admin());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user(RoleName::Admin, None).unwrap();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"name\":\"ADMIN\""));
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = create_test_user(RoleName::Admin, None).unwrap();
        let debug = format!("{:?}", user);

        assert!(!debug.contains("hashed_password"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_update_touches_timestamp() {
        let mut user = create_test_user(RoleName::Admin, None).unwrap();
        let original_updated = user.updated_at();

        // Small delay to ensure timestamp differs
        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_email("new@example.com");
        assert_eq!(user.email(), "new@example.com");
        assert!(user.updated_at() > original_updated);
    }
}
