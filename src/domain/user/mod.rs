//! User domain
//!
//! This module provides domain types and traits for user records: the stored
//! entity, client payloads before and after the lifecycle guard, field
//! validation, viewer-aware projection and the record store trait.

mod entity;
mod payload;
mod repository;
mod validation;
mod view;

pub use entity::{EmailNotificationFrequency, HashedPassword, User, UserId};
pub use payload::{NewUser, PlaintextPassword, UserChanges, UserDraft, UserPatch};
pub use repository::{UserCriteria, UserRepository};
pub use validation::{
    validate_email, validate_language, validate_username, UserValidationError,
    DEFAULT_RESERVED_USERNAMES,
};
pub use view::{project, UserView, Viewer, USER_VIEW_TYPE};

#[cfg(test)]
pub use repository::MockUserRepository;
