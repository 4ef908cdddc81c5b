//! Role domain
//!
//! The fixed set of staff roles and the read-only directory used to resolve them.

mod entity;
mod repository;

pub use entity::{Role, RoleId, RoleName};
pub use repository::RoleRepository;
