//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserChanges, UserCriteria, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct Inner {
    users: BTreeMap<UserId, User>,
    next_id: u64,
}

impl Inner {
    /// Reject `candidate` if another record already owns one of its unique keys
    fn check_unique(&self, candidate: &User) -> Result<(), DomainError> {
        for other in self.users.values().filter(|u| u.id() != candidate.id()) {
            if other.username() == candidate.username() {
                return Err(DomainError::validation(format!(
                    "Username '{}' already exists",
                    candidate.username()
                )));
            }

            if other.email() == candidate.email() {
                return Err(DomainError::validation(format!(
                    "Email '{}' already exists",
                    candidate.email()
                )));
            }

            if let Some(provider_id) = candidate.id_in_provider() {
                if other.id_in_provider() == Some(provider_id) {
                    return Err(DomainError::validation(format!(
                        "Provider id '{}' already exists",
                        provider_id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Create a repository with initial users; new ids continue after the highest one
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id().value()).max().unwrap_or(0) + 1;
        let users = users.into_iter().map(|u| (u.id(), u)).collect();

        Self {
            inner: Arc::new(RwLock::new(Inner { users, next_id })),
        }
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;

        let mut found: Vec<User> = ids
            .iter()
            .filter_map(|id| inner.users.get(id))
            .cloned()
            .collect();

        // Duplicate ids in the request yield one record each
        found.sort_by_key(|u| u.id());
        found.dedup_by_key(|u| u.id());

        Ok(found)
    }

    async fn find_one(&self, criteria: &UserCriteria) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| criteria.matches(u)).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let user = User::from_new(UserId::new(inner.next_id), user);
        inner.check_unique(&user)?;

        inner.next_id += 1;
        inner.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let mut user = inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.apply(changes);
        inner.check_unique(&user)?;
        user.mark_written();
        inner.users.insert(id, user.clone());

        Ok(user)
    }

    async fn persist(&self, user: &User) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;

        let stored_revision = inner
            .users
            .get(&user.id())
            .map(User::revision)
            .ok_or_else(|| {
                DomainError::storage(format!("Cannot persist user '{}': no such record", user.id()))
            })?;

        if stored_revision != user.revision() {
            return Err(DomainError::storage(format!(
                "Cannot persist user '{}': record changed since it was read",
                user.id()
            )));
        }

        inner.check_unique(user)?;

        let mut user = user.clone();
        user.mark_written();
        inner.users.insert(user.id(), user);

        Ok(())
    }
}
