//! Infrastructure layer - storage backends, crypto, mail and services

pub mod auth;
pub mod branch;
pub mod logging;
pub mod notification;
pub mod role;
pub mod storage;
pub mod user;
