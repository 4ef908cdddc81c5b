//! EyeCare clinic management API
//!
//! Staff account lifecycle with role transitions, doctor profiles kept in
//! lockstep with the DOCTOR role, onboarding emails with temporary
//! credentials, and clinic branch management.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};

use api::state::AppState;
use config::{BootstrapConfig, EmailConfig, StorageBackend, StorageSettings};
use domain::notification::OnboardingNotifier;
use domain::role::{RoleName, RoleRepository};
use domain::user::UserRepository;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    branch::{
        BranchService, BranchServiceTrait, InMemoryBranchRepository, PostgresBranchRepository,
    },
    notification::{DisabledNotifier, SmtpConfig, SmtpOnboardingNotifier},
    role::{InMemoryRoleRepository, PostgresRoleRepository},
    storage::{run_storage_migrations, PostgresConfig},
    user::{
        AdminAccount, Argon2Hasher, CredentialGenerator, InMemoryUserRepository,
        PostgresUserRepository, RandomPasswordGenerator, UserService, UserServiceTrait,
    },
};

/// Services wired to the configured storage backend
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserServiceTrait>,
    pub branches: Arc<dyn BranchServiceTrait>,
    pub roles: Arc<dyn RoleRepository>,
}

/// Create the application state: services, seeded roles, bootstrap admin and JWT signer
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_service = JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.expiration_hours,
    ))
    .context("Set auth.jwt_secret (APP__AUTH__JWT_SECRET) before serving")?;

    let services = build_services(config).await?;
    seed(&services, &config.bootstrap).await?;

    Ok(AppState::new(
        services.users,
        services.branches,
        Arc::new(jwt_service),
        services.roles,
    ))
}

/// Build services for the configured backend without seeding anything
pub async fn build_services(config: &AppConfig) -> anyhow::Result<Services> {
    let hasher = Arc::new(Argon2Hasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?);
    let generator: Arc<dyn CredentialGenerator> = Arc::new(RandomPasswordGenerator::new());
    let notifier = create_notifier(&config.email)?;

    info!(backend = ?config.storage.backend, notifier = notifier.name(), "Building services");

    let services = match config.storage.backend {
        StorageBackend::Memory => {
            let roles: Arc<dyn RoleRepository> = Arc::new(InMemoryRoleRepository::new());
            Services {
                users: user_service(
                    Arc::new(InMemoryUserRepository::new()),
                    roles.clone(),
                    hasher,
                    generator,
                    notifier,
                ),
                branches: Arc::new(BranchService::new(Arc::new(InMemoryBranchRepository::new()))),
                roles,
            }
        }
        StorageBackend::Postgres => {
            let pool = connect_postgres(&config.storage).await?;

            if config.storage.run_migrations {
                let applied = run_storage_migrations(&pool).await?;
                info!(applied, "Storage migrations complete");
            }

            let roles: Arc<dyn RoleRepository> =
                Arc::new(PostgresRoleRepository::new(pool.clone()));
            Services {
                users: user_service(
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    roles.clone(),
                    hasher,
                    generator,
                    notifier,
                ),
                branches: Arc::new(BranchService::new(Arc::new(PostgresBranchRepository::new(
                    pool,
                )))),
                roles,
            }
        }
    };

    Ok(services)
}

fn user_service<R: UserRepository + 'static>(
    repository: Arc<R>,
    roles: Arc<dyn RoleRepository>,
    hasher: Arc<Argon2Hasher>,
    generator: Arc<dyn CredentialGenerator>,
    notifier: Arc<dyn OnboardingNotifier>,
) -> Arc<dyn UserServiceTrait> {
    Arc::new(UserService::new(repository, roles, hasher, generator, notifier))
}

/// Open the PostgreSQL pool described by the storage settings
pub async fn connect_postgres(storage: &StorageSettings) -> anyhow::Result<PgPool> {
    let pool = PostgresConfig::new(storage.database_url.clone())
        .with_max_connections(storage.max_connections)
        .connect()
        .await
        .context("Set storage.database_url (APP__STORAGE__DATABASE_URL) for the postgres backend")?;

    Ok(pool)
}

/// Seed the role directory and create the bootstrap admin
///
/// Safe to run on every start. A missing ADMIN role after seeding is fatal.
pub async fn seed(services: &Services, bootstrap: &BootstrapConfig) -> anyhow::Result<()> {
    let roles = services.roles.seed().await?;
    services.roles.require(RoleName::Admin).await?;
    info!(count = roles.len(), "Roles seeded");

    bootstrap_admin(services.users.as_ref(), bootstrap).await
}

async fn bootstrap_admin(
    users: &dyn UserServiceTrait,
    bootstrap: &BootstrapConfig,
) -> anyhow::Result<()> {
    let Some(password) = bootstrap.admin_password.clone().filter(|p| !p.is_empty()) else {
        warn!(
            username = %bootstrap.admin_username,
            "No bootstrap admin password configured; skipping admin creation"
        );
        return Ok(());
    };

    let account = AdminAccount {
        full_name: bootstrap.admin_full_name.clone(),
        username: bootstrap.admin_username.clone(),
        email: bootstrap.admin_email.clone(),
        password,
    };

    match users.ensure_admin(account).await? {
        Some(user) => info!(user_id = %user.id(), username = %user.username(), "Bootstrap admin created"),
        None => info!(username = %bootstrap.admin_username, "Bootstrap admin already exists"),
    }

    Ok(())
}

fn create_notifier(email: &EmailConfig) -> anyhow::Result<Arc<dyn OnboardingNotifier>> {
    if !email.enabled {
        warn!("Email delivery disabled; onboarding credentials will not be sent");
        return Ok(Arc::new(DisabledNotifier));
    }

    let notifier = SmtpOnboardingNotifier::new(SmtpConfig {
        host: email.smtp_host.clone(),
        port: email.smtp_port,
        from_email: email.from_email.clone(),
        from_name: email.from_name.clone(),
        username: email.username.clone(),
        password: email.password.clone(),
        use_tls: email.use_tls,
    })?;

    Ok(Arc::new(notifier))
}
