//! Branch infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresBranchRepository;
pub use repository::InMemoryBranchRepository;
pub use service::{BranchService, BranchServiceTrait, CreateBranchRequest, UpdateBranchRequest};
