//! Doctor profile domain

mod entity;
mod repository;

pub use entity::{DoctorProfile, DoctorProfileChanges};
pub use repository::DoctorProfileStore;
