//! Identity core
//!
//! The in-process rules a user store must run around every write:
//! - Salted password hashing and verification (Argon2id, configurable cost)
//! - A lifecycle guard for create/update payloads that hashes secrets,
//!   sanitizes text and drops fields a client may not set
//! - Viewer-aware projection of user records
//! - Batch, non-transactional role assignment

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::UserRepository;
use infrastructure::{Argon2Hasher, HtmlSanitizer, LifecycleGuard, PasswordService, UserService};

/// User service with the default hasher and sanitizer
pub type DefaultUserService<R> = UserService<R, Argon2Hasher, HtmlSanitizer>;

/// Wire a user service around `repository` from configuration
pub fn create_user_service<R: UserRepository>(
    config: &AppConfig,
    repository: Arc<R>,
) -> DefaultUserService<R> {
    let passwords = PasswordService::new(Arc::new(Argon2Hasher::new(config.password.clone())));
    let guard = LifecycleGuard::new(
        passwords,
        Arc::new(HtmlSanitizer::new()),
        config.users.clone(),
    );

    UserService::new(repository, guard)
}
