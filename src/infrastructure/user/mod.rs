//! User infrastructure module
//!
//! Password hashing with Argon2, temporary credential generation, the
//! in-memory and PostgreSQL repositories, and the user lifecycle service.

mod generator;
mod password;
mod postgres_repository;
mod repository;
mod service;

pub use generator::{
    CredentialGenerator, RandomPasswordGenerator, TEMPORARY_PASSWORD_ALPHABET,
    TEMPORARY_PASSWORD_LENGTH,
};
pub use password::{Argon2Hasher, PasswordHasher};
pub(crate) use postgres_repository::map_write_error;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    AdminAccount, CreateUserRequest, OnboardingResult, UpdateUserRequest, UserService,
    UserServiceTrait,
};
