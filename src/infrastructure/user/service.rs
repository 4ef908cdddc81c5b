//! User lifecycle service
//!
//! Creates, updates and deletes staff accounts. Every multi-row write goes
//! through one repository transaction, so the user row and its doctor profile
//! change together or not at all. The onboarding notification is sent only
//! after the create transaction has committed.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::doctor::DoctorProfileChanges;
use crate::domain::notification::{NotificationOutcome, OnboardingMessage, OnboardingNotifier};
use crate::domain::role::{RoleName, RoleRepository};
use crate::domain::user::{
    validate_password, validate_required, User, UserId, UserRepository, UserValidationError,
};
use crate::domain::DomainError;

use super::generator::CredentialGenerator;
use super::password::PasswordHasher;

/// Input for creating a staff account
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

/// Partial update; `None` leaves the field unchanged
#[derive(Clone, Default)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_name: Option<String>,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("role_name", &self.role_name)
            .field("license_number", &self.license_number)
            .field("specialization", &self.specialization)
            .finish()
    }
}

/// Initial administrator provisioned at startup
#[derive(Clone)]
pub struct AdminAccount {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A created user together with the outcome of its onboarding notification
#[derive(Debug, Clone)]
pub struct OnboardingResult {
    pub user: User,
    pub notification: NotificationOutcome,
}

impl OnboardingResult {
    pub fn email_sent(&self) -> bool {
        self.notification.is_delivered()
    }
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Create an account with a generated temporary password
    async fn create(&self, request: CreateUserRequest) -> Result<OnboardingResult, DomainError>;

    /// Apply a partial update and reconcile the doctor profile
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError>;

    /// Delete an account and its doctor profile
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Get a user by ID; fails with `NotFound` when absent
    async fn get(&self, id: &str) -> Result<User, DomainError>;

    /// List users ordered by full name
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    /// Check a username/password pair; `None` for unknown users or bad passwords
    async fn authenticate(&self, username: &str, password: &str)
    -> Result<Option<User>, DomainError>;

    /// Create the administrator unless the username is taken
    ///
    /// Returns `None` when the account already exists.
    async fn ensure_admin(&self, account: AdminAccount) -> Result<Option<User>, DomainError>;
}

/// User lifecycle service
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    roles: Arc<dyn RoleRepository>,
    hasher: Arc<H>,
    generator: Arc<dyn CredentialGenerator>,
    notifier: Arc<dyn OnboardingNotifier>,
    /// Verified against on unknown usernames so a miss costs one hash check
    dummy_hash: OnceCell<String>,
}

impl<R: UserRepository, H: PasswordHasher> std::fmt::Debug for UserService<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("repository", &self.repository)
            .field("roles", &self.roles)
            .field("hasher", &self.hasher)
            .field("notifier", &self.notifier.name())
            .finish_non_exhaustive()
    }
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(
        repository: Arc<R>,
        roles: Arc<dyn RoleRepository>,
        hasher: Arc<H>,
        generator: Arc<dyn CredentialGenerator>,
        notifier: Arc<dyn OnboardingNotifier>,
    ) -> Self {
        Self {
            repository,
            roles,
            hasher,
            generator,
            notifier,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Malformed identifiers cannot name an existing user
    fn parse_id(id: &str) -> Result<UserId, DomainError> {
        UserId::parse(id).map_err(|_| DomainError::not_found("User not found"))
    }

    async fn find(&self, user_id: &UserId) -> Result<User, DomainError> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    async fn notify(&self, user: &User, temporary_password: String) -> NotificationOutcome {
        let message = OnboardingMessage {
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            username: user.username().to_string(),
            temporary_password,
            role_name: user.role_name(),
        };

        let outcome = self.notifier.send(&message).await;

        match &outcome {
            NotificationOutcome::Delivered { message_id } => {
                info!(
                    user_id = %user.id(),
                    provider = self.notifier.name(),
                    message_id = ?message_id,
                    "Onboarding email sent"
                );
            }
            NotificationOutcome::Failed { reason } => {
                warn!(
                    user_id = %user.id(),
                    provider = self.notifier.name(),
                    reason = %reason,
                    "Onboarding email not delivered"
                );
            }
        }

        outcome
    }
}

#[async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn create(&self, request: CreateUserRequest) -> Result<OnboardingResult, DomainError> {
        validate_required("Full name", &request.full_name)?;
        validate_required("Username", &request.username)?;
        validate_required("Email", &request.email)?;
        validate_required("Role", &request.role_name)?;

        let role = self.roles.resolve(&request.role_name).await?;

        // Doctor details are checked before anything is written
        let doctor_changes = if role.name().is_doctor() {
            let changes =
                DoctorProfileChanges::from_input(request.license_number, request.specialization);
            if !changes.is_complete() {
                return Err(UserValidationError::MissingDoctorDetails.into());
            }
            Some(changes)
        } else {
            None
        };

        let temporary_password = self.generator.temporary_password();
        let password_hash = self.hasher.hash(&temporary_password)?;

        let user_id = UserId::generate();
        let profile = doctor_changes
            .clone()
            .map(|changes| changes.apply(&user_id, None));
        let mut user = User::new(
            user_id,
            request.full_name,
            request.username,
            request.email,
            password_hash,
            &role,
            profile,
        )?;

        {
            let mut tx = self.repository.begin().await?;
            tx.insert_user(&user).await?;
            if let Some(changes) = doctor_changes {
                let stored = tx.upsert(user.id(), changes).await?;
                user.assign_role(&role, Some(stored))?;
            }
            tx.commit().await?;
        }

        info!(
            user_id = %user.id(),
            username = %user.username(),
            role = %user.role_name(),
            "User created"
        );

        let notification = self.notify(&user, temporary_password).await;

        Ok(OnboardingResult { user, notification })
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        let user_id = Self::parse_id(id)?;

        // Empty passwords and emails count as not supplied
        let password = request.password.filter(|p| !p.is_empty());
        if let Some(password) = &password {
            validate_password(password)?;
        }
        if let Some(full_name) = &request.full_name {
            validate_required("Full name", full_name)?;
        }
        if let Some(username) = &request.username {
            validate_required("Username", username)?;
        }

        let resolved = match request.role_name.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(name) => match self.roles.resolve(name).await {
                Ok(role) => Some(role),
                Err(DomainError::InvalidRole { .. }) => {
                    warn!(user_id = %user_id, role = %name, "Ignoring unknown role on update");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        let password_hash = match password {
            Some(password) => Some(self.hasher.hash(&password)?),
            None => None,
        };

        let mut tx = self.repository.begin().await?;

        // Read under the transaction so unsupplied fields keep their committed values
        let mut user = tx
            .get_user(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        let current_role = user.role_name();
        let target = match resolved {
            Some(role) => role,
            None => self.roles.require(current_role).await?,
        };

        if let Some(full_name) = request.full_name {
            user.set_full_name(full_name);
        }
        if let Some(username) = request.username {
            user.set_username(username);
        }
        if let Some(email) = request.email.filter(|e| !e.trim().is_empty()) {
            user.set_email(email);
        }
        if let Some(password_hash) = password_hash {
            user.set_password_hash(password_hash);
        }

        let profile = if target.name().is_doctor() {
            let changes =
                DoctorProfileChanges::from_input(request.license_number, request.specialization);
            Some(tx.upsert(&user_id, changes).await?)
        } else {
            if current_role.is_doctor() {
                let removed = tx.delete_by_user(&user_id).await?;
                debug!(user_id = %user_id, removed, "Detached doctor profile");
            }
            None
        };

        user.assign_role(&target, profile)?;
        tx.update_user(&user).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            from_role = %current_role,
            to_role = %user.role_name(),
            "User updated"
        );

        Ok(user)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = Self::parse_id(id)?;

        let mut tx = self.repository.begin().await?;
        if tx.get_user(&user_id).await?.is_none() {
            return Err(DomainError::not_found("User not found"));
        }

        tx.delete_by_user(&user_id).await?;
        if !tx.delete_user(&user_id).await? {
            return Err(DomainError::not_found("User not found"));
        }
        tx.commit().await?;

        info!(user_id = %user_id, "User deleted");

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = Self::parse_id(id)?;
        self.find(&user_id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_username(username).await? {
            Some(u) => u,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| async { self.hasher.hash(DUMMY_PASSWORD) })
                    .await?;
                self.hasher.verify(password, dummy);
                return Ok(None);
            }
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn ensure_admin(&self, account: AdminAccount) -> Result<Option<User>, DomainError> {
        if self
            .repository
            .get_by_username(&account.username)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        validate_required("Email", &account.email)?;
        let role = self.roles.require(RoleName::Admin).await?;
        let password_hash = self.hasher.hash(&account.password)?;

        let user = User::new(
            UserId::generate(),
            account.full_name,
            account.username,
            account.email,
            password_hash,
            &role,
            None,
        )?;

        let mut tx = self.repository.begin().await?;
        tx.insert_user(&user).await?;
        tx.commit().await?;

        info!(user_id = %user.id(), username = %user.username(), "Admin user created");

        Ok(Some(user))
    }
}
