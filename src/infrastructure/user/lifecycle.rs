//! Create/update guard for user payloads

use std::sync::Arc;

use tracing::debug;

use crate::config::UsersConfig;
use crate::domain::user::{
    validate_email, validate_language, validate_username, NewUser, UserChanges, UserDraft,
    UserPatch,
};
use crate::domain::{DomainError, Sanitizer};

use super::password::{PasswordHasher, PasswordService};

/// Runs before every create and update of a user record.
///
/// Inputs are never modified; each call builds a fresh payload. Secrets are
/// hashed, never sanitized, because rewriting them would leave a hash the
/// user cannot reproduce at login.
pub struct LifecycleGuard<H: PasswordHasher, S: Sanitizer> {
    passwords: PasswordService<H>,
    sanitizer: Arc<S>,
    config: UsersConfig,
}

impl<H: PasswordHasher + 'static, S: Sanitizer> LifecycleGuard<H, S> {
    pub fn new(passwords: PasswordService<H>, sanitizer: Arc<S>, config: UsersConfig) -> Self {
        Self {
            passwords,
            sanitizer,
            config,
        }
    }

    pub fn passwords(&self) -> &PasswordService<H> {
        &self.passwords
    }

    /// Prepare a create payload.
    ///
    /// Relation fields (`consumers`, `roles`) and privilege flags (`isAdmin`,
    /// `isModerator`) are dropped whatever their value. A password, if any,
    /// is replaced by its hash; without one the result has no password.
    pub async fn before_create(&self, draft: &UserDraft) -> Result<NewUser, DomainError> {
        if draft.is_admin.is_some() || draft.is_moderator.is_some() {
            debug!(username = %draft.username, "Dropping privilege flags from create payload");
        }
        if draft.consumers.is_some() || draft.roles.is_some() {
            debug!(username = %draft.username, "Dropping relation fields from create payload");
        }

        let s = self.sanitizer.as_ref();

        let password = match draft.password.as_ref().filter(|p| !p.is_empty()) {
            Some(plaintext) => Some(self.passwords.generate_password(plaintext.expose()).await?),
            None => None,
        };

        Ok(NewUser {
            id_in_provider: s.clean_opt(draft.id_in_provider.as_deref()),
            username: s.clean(&draft.username),
            email: s.clean(&draft.email),
            password,
            display_name: s.clean_opt(draft.display_name.as_deref()),
            biography: s.clean_opt(draft.biography.as_deref()),
            gender: s.clean_opt(draft.gender.as_deref()),
            birth_date: draft.birth_date,
            active: draft.active.unwrap_or(false),
            language: draft
                .language
                .as_deref()
                .map(|l| s.clean(l))
                .unwrap_or_else(|| self.config.default_language.clone()),
            location_state: s.clean_opt(draft.location_state.as_deref()),
            city: s.clean_opt(draft.city.as_deref()),
            email_notification_frequency: draft.email_notification_frequency.unwrap_or_default(),
        })
    }

    /// Prepare an update payload.
    ///
    /// A `newPassword` is hashed into `password`; otherwise the stored hash is
    /// left alone. Privilege flags pass through unchanged, so callers must
    /// authorize them before handing the patch over.
    pub async fn before_update(&self, patch: &UserPatch) -> Result<UserChanges, DomainError> {
        let s = self.sanitizer.as_ref();

        let password = match patch.new_password.as_ref().filter(|p| !p.is_empty()) {
            Some(plaintext) => {
                debug!("Rotating password hash");
                Some(self.passwords.generate_password(plaintext.expose()).await?)
            }
            None => None,
        };

        Ok(UserChanges {
            id_in_provider: s.clean_opt(patch.id_in_provider.as_deref()),
            username: s.clean_opt(patch.username.as_deref()),
            email: s.clean_opt(patch.email.as_deref()),
            password,
            display_name: s.clean_opt(patch.display_name.as_deref()),
            biography: s.clean_opt(patch.biography.as_deref()),
            gender: s.clean_opt(patch.gender.as_deref()),
            birth_date: patch.birth_date,
            active: patch.active,
            is_admin: patch.is_admin,
            is_moderator: patch.is_moderator,
            language: s.clean_opt(patch.language.as_deref()),
            location_state: s.clean_opt(patch.location_state.as_deref()),
            city: s.clean_opt(patch.city.as_deref()),
            email_notification_frequency: patch.email_notification_frequency,
        })
    }

    /// Field rules a new record must satisfy before it reaches the store
    pub fn validate_new_user(&self, user: &NewUser) -> Result<(), DomainError> {
        validate_username(&user.username, &self.config.reserved_usernames)?;
        validate_email(&user.email)?;
        validate_language(&user.language)?;
        Ok(())
    }

    /// Same rules as [`validate_new_user`](Self::validate_new_user), for the fields present
    pub fn validate_changes(&self, changes: &UserChanges) -> Result<(), DomainError> {
        if let Some(username) = &changes.username {
            validate_username(username, &self.config.reserved_usernames)?;
        }
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }
        if let Some(language) = &changes.language {
            validate_language(language)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordConfig;
    use crate::domain::EmailNotificationFrequency;
    use crate::infrastructure::sanitizer::HtmlSanitizer;
    use crate::infrastructure::user::password::Argon2Hasher;

    fn guard() -> LifecycleGuard<Argon2Hasher, HtmlSanitizer> {
        let hasher = Argon2Hasher::new(PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        });
        LifecycleGuard::new(
            PasswordService::new(Arc::new(hasher)),
            Arc::new(HtmlSanitizer::new()),
            UsersConfig::default(),
        )
    }

    fn draft(json: serde_json::Value) -> UserDraft {
        serde_json::from_value(json).unwrap()
    }

    fn patch(json: serde_json::Value) -> UserPatch {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_before_create_drops_privileges_and_hashes() {
        let guard = guard();
        let input = draft(serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "isAdmin": true,
            "isModerator": true,
            "password": "pw"
        }));

        let out = guard.before_create(&input).await.unwrap();
        let json = serde_json::to_value(&out).unwrap();

        assert!(json.get("isAdmin").is_none());
        assert!(json.get("isModerator").is_none());

        let hash = out.password.as_ref().unwrap();
        assert_ne!(hash.as_str(), "pw");
        assert!(guard.passwords().verify_password("pw", Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn test_before_create_drops_relation_fields() {
        let guard = guard();
        let input = draft(serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "consumers": ["oauth-client"],
            "roles": [1, 2]
        }));

        let json = serde_json::to_value(guard.before_create(&input).await.unwrap()).unwrap();

        assert!(json.get("consumers").is_none());
        assert!(json.get("roles").is_none());
    }

    #[tokio::test]
    async fn test_before_create_without_password() {
        let guard = guard();

        let out = guard.before_create(&UserDraft::default()).await.unwrap();
        assert!(out.password.is_none());

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_before_create_empty_password_is_absent() {
        let guard = guard();
        let input = UserDraft::new("alice", "a@x.com").with_password("");

        let out = guard.before_create(&input).await.unwrap();
        assert!(out.password.is_none());
    }

    #[tokio::test]
    async fn test_before_create_sanitizes_strings_but_not_password() {
        let guard = guard();
        let input = draft(serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "displayName": "<b>Alice</b>",
            "biography": "<script>steal()</script>Hello",
            "password": "<b>pw</b>"
        }));

        let out = guard.before_create(&input).await.unwrap();

        assert_eq!(out.display_name.as_deref(), Some("Alice"));
        assert_eq!(out.biography.as_deref(), Some("Hello"));
        assert!(
            guard
                .passwords()
                .verify_password("<b>pw</b>", out.password.as_ref())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_before_create_applies_defaults() {
        let guard = guard();

        let out = guard
            .before_create(&UserDraft::new("alice", "a@x.com"))
            .await
            .unwrap();

        assert_eq!(out.language, "pt-br");
        assert!(!out.active);
        assert_eq!(
            out.email_notification_frequency,
            EmailNotificationFrequency::Instant
        );
    }

    #[tokio::test]
    async fn test_before_create_does_not_modify_input() {
        let guard = guard();
        let input = UserDraft::new("<i>alice</i>", "a@x.com").with_password("pw");

        let _ = guard.before_create(&input).await.unwrap();

        assert_eq!(input.username, "<i>alice</i>");
        assert_eq!(input.password.as_ref().unwrap().expose(), "pw");
    }

    #[tokio::test]
    async fn test_before_create_is_idempotent_on_clean_input() {
        let guard = guard();
        let input = draft(serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "displayName": "Alice & Bob",
            "city": "Recife"
        }));

        let first = guard.before_create(&input).await.unwrap();
        let second_input = UserDraft {
            display_name: first.display_name.clone(),
            city: first.city.clone(),
            ..UserDraft::new(first.username.clone(), first.email.clone())
        };
        let second = guard.before_create(&second_input).await.unwrap();

        assert_eq!(first.display_name, second.display_name);
        assert_eq!(first.city, second.city);
        assert_eq!(first.username, second.username);
    }

    #[tokio::test]
    async fn test_before_update_hashes_new_password() {
        let guard = guard();

        let out = guard
            .before_update(&patch(serde_json::json!({ "newPassword": "abc" })))
            .await
            .unwrap();

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("newPassword").is_none());

        let hash = out.password.as_ref().unwrap();
        assert!(guard.passwords().verify_password("abc", Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn test_before_update_without_new_password_leaves_password() {
        let guard = guard();

        let out = guard
            .before_update(&patch(serde_json::json!({
                "password": "plaintext-attempt",
                "city": "<b>Olinda</b>"
            })))
            .await
            .unwrap();

        assert!(out.password.is_none());
        assert_eq!(out.city.as_deref(), Some("Olinda"));
    }

    #[tokio::test]
    async fn test_before_update_passes_privilege_flags_through() {
        let guard = guard();

        let out = guard
            .before_update(&patch(serde_json::json!({ "isAdmin": true })))
            .await
            .unwrap();

        assert_eq!(out.is_admin, Some(true));
        assert_eq!(out.is_moderator, None);
    }

    #[tokio::test]
    async fn test_hash_error_aborts_create() {
        let hasher = Argon2Hasher::new(PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 0,
            parallelism: 1,
        });
        let guard = LifecycleGuard::new(
            PasswordService::new(Arc::new(hasher)),
            Arc::new(HtmlSanitizer::new()),
            UsersConfig::default(),
        );

        let result = guard
            .before_create(&UserDraft::new("alice", "a@x.com").with_password("pw"))
            .await;
        assert!(matches!(result, Err(DomainError::Hash { .. })));

        let result = guard
            .before_update(&UserPatch::default().with_new_password("pw"))
            .await;
        assert!(matches!(result, Err(DomainError::Hash { .. })));
    }

    #[tokio::test]
    async fn test_validate_new_user() {
        let guard = guard();

        let ok = guard
            .before_create(&UserDraft::new("alice", "a@x.com"))
            .await
            .unwrap();
        assert!(guard.validate_new_user(&ok).is_ok());

        let reserved = guard
            .before_create(&UserDraft::new("admin", "a@x.com"))
            .await
            .unwrap();
        assert!(guard.validate_new_user(&reserved).unwrap_err().is_validation());

        let bad_pattern = guard
            .before_create(&UserDraft::new("al ice", "a@x.com"))
            .await
            .unwrap();
        assert!(guard.validate_new_user(&bad_pattern).is_err());
    }

    #[test]
    fn test_validate_changes_only_checks_present_fields() {
        let guard = guard();

        assert!(guard.validate_changes(&UserChanges::default()).is_ok());
        assert!(
            guard
                .validate_changes(&UserChanges {
                    username: Some("api".to_string()),
                    ..UserChanges::default()
                })
                .is_err()
        );
        assert!(
            guard
                .validate_changes(&UserChanges {
                    email: Some("broken".to_string()),
                    ..UserChanges::default()
                })
                .is_err()
        );
    }
}
