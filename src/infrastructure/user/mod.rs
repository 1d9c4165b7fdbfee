//! User infrastructure module
//!
//! This module provides implementations for the user lifecycle: Argon2
//! password hashing, the create/update guard, batch role assignment, an
//! in-memory record store, and the service tying them together.

mod lifecycle;
mod password;
mod repository;
mod roles;
mod service;

pub use lifecycle::LifecycleGuard;
pub use password::{Argon2Hasher, PasswordHasher, PasswordService};
pub use repository::InMemoryUserRepository;
pub use roles::RoleAssigner;
pub use service::UserService;
