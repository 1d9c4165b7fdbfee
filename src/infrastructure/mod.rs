//! Infrastructure layer - Implementations of the domain seams

pub mod logging;
pub mod sanitizer;
pub mod user;

pub use sanitizer::HtmlSanitizer;
pub use user::{
    Argon2Hasher, InMemoryUserRepository, LifecycleGuard, PasswordHasher, PasswordService,
    RoleAssigner, UserService,
};
