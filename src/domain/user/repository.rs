//! User record store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId};
use super::payload::{NewUser, UserChanges};
use crate::domain::DomainError;

/// Single-field lookup used by find-or-create flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCriteria {
    Username(String),
    Email(String),
    IdInProvider(String),
}

impl UserCriteria {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Username(username) => user.username() == username,
            Self::Email(email) => user.email() == email,
            Self::IdInProvider(id) => user.id_in_provider() == Some(id.as_str()),
        }
    }
}

/// Record store for users.
///
/// Implementations enforce uniqueness of username, email and provider id and
/// report conflicts as `DomainError::Validation`. Single-record writes are
/// atomic; nothing spanning several records is.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by id
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Fetch every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Find the first user matching `criteria`
    async fn find_one(&self, criteria: &UserCriteria) -> Result<Option<User>, DomainError>;

    /// Insert a guarded create payload and assign it an id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Apply a guarded update payload to an existing user
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, DomainError>;

    /// Write back a full user record.
    ///
    /// Fails with `DomainError::Storage` when the record was written by
    /// someone else since `user` was read, so a stale copy never overwrites
    /// newer fields such as a rotated password.
    async fn persist(&self, user: &User) -> Result<(), DomainError>;
}
