//! Domain layer - Core business rules and entities

pub mod error;
pub mod role;
pub mod sanitize;
pub mod user;

pub use error::DomainError;
pub use role::{Role, RoleId};
pub use sanitize::Sanitizer;
pub use user::{
    project, EmailNotificationFrequency, HashedPassword, NewUser, PlaintextPassword, User,
    UserChanges, UserCriteria, UserDraft, UserId, UserPatch, UserRepository, UserView, Viewer,
};
