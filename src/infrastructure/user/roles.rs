//! Batch role assignment

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::domain::user::{UserId, UserRepository};
use crate::domain::{DomainError, RoleId};

/// Attaches a role to a batch of users.
///
/// Not transactional: every user is written independently and concurrently.
/// On error only the first failure is reported, and any other member of the
/// batch may or may not have been written. Callers must read an error as
/// "at least one failed", never "none succeeded".
pub struct RoleAssigner<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> RoleAssigner<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Add `role` to every user in `user_ids`.
    ///
    /// Ids that match no record are skipped. Fails with `NotFound` only when
    /// none of them match, and with `PartialFailure` wrapping the first
    /// persist error otherwise.
    pub async fn add_role(
        &self,
        user_ids: &[UserId],
        role: impl Into<RoleId>,
    ) -> Result<(), DomainError> {
        let role = role.into();

        let users = self.repository.find_by_ids(user_ids).await?;
        if users.is_empty() {
            return Err(DomainError::not_found(format!(
                "No user was found for ids {:?}",
                user_ids.iter().map(UserId::value).collect::<Vec<_>>()
            )));
        }

        let batch_size = users.len();
        let repository = &self.repository;

        let mut pending: FuturesUnordered<_> = users
            .into_iter()
            .map(|mut user| async move {
                user.add_role(role);
                repository
                    .persist(&user)
                    .await
                    .map_err(|err| (user.id(), err))
            })
            .collect();

        let mut first_error = None;

        while let Some(result) = pending.next().await {
            if let Err((user_id, err)) = result {
                warn!(%user_id, role_id = %role, error = %err, "Failed to persist role membership");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(DomainError::partial_failure(err)),
            None => {
                info!(role_id = %role, users = batch_size, "Role added to users");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, NewUser, User};
    use crate::domain::Role;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn user(id: u64) -> User {
        User::from_new(
            UserId::new(id),
            NewUser {
                username: format!("user{id}"),
                email: format!("user{id}@example.com"),
                language: "en".to_string(),
                ..NewUser::default()
            },
        )
    }

    fn seeded_repo() -> Arc<InMemoryUserRepository> {
        Arc::new(InMemoryUserRepository::with_users(vec![user(10), user(11)]))
    }

    fn ids(raw: &[u64]) -> Vec<UserId> {
        raw.iter().copied().map(UserId::new).collect()
    }

    #[tokio::test]
    async fn test_add_role_to_all_users() {
        let repo = seeded_repo();
        let assigner = RoleAssigner::new(Arc::clone(&repo));
        let role = Role::new(RoleId::new(1), "editors");

        assigner.add_role(&ids(&[10, 11]), &role).await.unwrap();

        for id in [10, 11] {
            let stored = repo.get(UserId::new(id)).await.unwrap().unwrap();
            assert!(stored.has_role(role.id()));
        }
    }

    #[tokio::test]
    async fn test_add_role_skips_unknown_ids() {
        let repo = seeded_repo();
        let assigner = RoleAssigner::new(Arc::clone(&repo));

        assigner
            .add_role(&ids(&[10, 11, 999]), RoleId::new(4))
            .await
            .unwrap();

        assert!(repo.get(UserId::new(10)).await.unwrap().unwrap().has_role(RoleId::new(4)));
        assert!(repo.get(UserId::new(11)).await.unwrap().unwrap().has_role(RoleId::new(4)));
        assert!(repo.get(UserId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_role_with_no_ids_is_not_found() {
        let assigner = RoleAssigner::new(seeded_repo());

        let err = assigner.add_role(&[], RoleId::new(1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_add_role_with_only_unknown_ids_is_not_found() {
        let assigner = RoleAssigner::new(seeded_repo());

        let err = assigner
            .add_role(&ids(&[999]), RoleId::new(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_add_role_keeps_existing_roles() {
        let repo = seeded_repo();
        let assigner = RoleAssigner::new(Arc::clone(&repo));

        assigner.add_role(&ids(&[10]), RoleId::new(1)).await.unwrap();
        assigner.add_role(&ids(&[10]), RoleId::new(2)).await.unwrap();
        assigner.add_role(&ids(&[10]), RoleId::new(2)).await.unwrap();

        let stored = repo.get(UserId::new(10)).await.unwrap().unwrap();
        assert_eq!(stored.roles().len(), 2);
    }

    #[tokio::test]
    async fn test_persist_failure_is_partial_failure_and_others_still_attempted() {
        let mut repo = MockUserRepository::new();

        repo.expect_find_by_ids()
            .times(1)
            .returning(|_| Ok(vec![user(10), user(11), user(12)]));
        repo.expect_persist().times(3).returning(|u| {
            if u.id() == UserId::new(11) {
                Err(DomainError::storage("write rejected"))
            } else {
                Ok(())
            }
        });

        let assigner = RoleAssigner::new(Arc::new(repo));
        let err = assigner
            .add_role(&ids(&[10, 11, 12]), RoleId::new(1))
            .await
            .unwrap_err();

        match err {
            DomainError::PartialFailure { source } => {
                assert!(matches!(*source, DomainError::Storage { .. }));
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_persisted_users_carry_the_role() {
        let mut repo = MockUserRepository::new();

        repo.expect_find_by_ids()
            .returning(|_| Ok(vec![user(10), user(11)]));
        repo.expect_persist()
            .times(2)
            .withf(|u| u.has_role(RoleId::new(5)))
            .returning(|_| Ok(()));

        let assigner = RoleAssigner::new(Arc::new(repo));
        tokio_test::assert_ok!(assigner.add_role(&ids(&[10, 11]), RoleId::new(5)).await);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_unwrapped() {
        let mut repo = MockUserRepository::new();

        repo.expect_find_by_ids()
            .returning(|_| Err(DomainError::storage("connection refused")));
        repo.expect_persist().never();

        let assigner = RoleAssigner::new(Arc::new(repo));
        let err = assigner
            .add_role(&ids(&[10]), RoleId::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
