//! User service: guarded create/update pipeline around the record store

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    project, User, UserCriteria, UserDraft, UserId, UserPatch, UserRepository, UserView, Viewer,
};
use crate::domain::{DomainError, PlaintextPassword, RoleId, Sanitizer};

use super::lifecycle::LifecycleGuard;
use super::password::PasswordHasher;
use super::roles::RoleAssigner;

/// User service for account lifecycle and role membership
pub struct UserService<R: UserRepository, H: PasswordHasher, S: Sanitizer> {
    repository: Arc<R>,
    guard: LifecycleGuard<H, S>,
    roles: RoleAssigner<R>,
}

impl<R, H, S> UserService<R, H, S>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
    S: Sanitizer,
{
    /// Create a new user service
    pub fn new(repository: Arc<R>, guard: LifecycleGuard<H, S>) -> Self {
        let roles = RoleAssigner::new(Arc::clone(&repository));
        Self {
            repository,
            guard,
            roles,
        }
    }

    /// Create a new user
    pub async fn create(&self, draft: &UserDraft) -> Result<User, DomainError> {
        let new_user = self.guard.before_create(draft).await?;
        self.guard.validate_new_user(&new_user)?;

        let user = self.repository.create(new_user).await?;
        info!(user_id = %user.id(), username = %user.username(), "User created");

        Ok(user)
    }

    /// Update an existing user.
    ///
    /// Privilege flags in `patch` are applied as given; authorize them first.
    pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<User, DomainError> {
        let changes = self.guard.before_update(patch).await?;
        self.guard.validate_changes(&changes)?;

        let rotated = changes.password.is_some();
        let user = self.repository.update(id, changes).await?;
        info!(user_id = %id, password_rotated = rotated, "User updated");

        Ok(user)
    }

    /// Replace a user's password
    pub async fn change_password(
        &self,
        id: UserId,
        new_password: impl Into<PlaintextPassword>,
    ) -> Result<User, DomainError> {
        let patch = UserPatch::default().with_new_password(new_password);
        self.update(id, &patch).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user projected for `viewer`
    pub async fn view(&self, id: UserId, viewer: &Viewer) -> Result<Option<UserView>, DomainError> {
        Ok(self
            .repository
            .get(id)
            .await?
            .map(|user| project(&user, viewer)))
    }

    /// Check a password against the stored hash of user `id`
    pub async fn verify_password(&self, id: UserId, plaintext: &str) -> Result<bool, DomainError> {
        let user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        self.guard
            .passwords()
            .verify_password(plaintext, user.password())
            .await
    }

    /// Return the user matching `criteria`, creating one from `draft` if none does
    pub async fn find_or_create(
        &self,
        criteria: &UserCriteria,
        draft: &UserDraft,
    ) -> Result<User, DomainError> {
        if let Some(user) = self.repository.find_one(criteria).await? {
            debug!(user_id = %user.id(), "Found existing user");
            return Ok(user);
        }

        self.create(draft).await
    }

    /// Add `role` to every user in `user_ids`; see [`RoleAssigner::add_role`]
    pub async fn add_role(
        &self,
        user_ids: &[UserId],
        role: impl Into<RoleId>,
    ) -> Result<(), DomainError> {
        self.roles.add_role(user_ids, role).await
    }
}
