//! Create and update payloads, before and after the lifecycle guard
//!
//! Client payloads (`UserDraft`, `UserPatch`) may carry plaintext secrets and
//! fields a client is not allowed to set. The guard turns them into
//! `NewUser` / `UserChanges`, which cannot represent either.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{EmailNotificationFrequency, HashedPassword};

/// A password exactly as the client typed it
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlaintextPassword(String);

impl PlaintextPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PlaintextPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PlaintextPassword(***)")
    }
}

impl From<&str> for PlaintextPassword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Create payload as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDraft {
    pub id_in_provider: Option<String>,
    pub username: String,
    pub email: String,
    pub password: Option<PlaintextPassword>,
    pub display_name: Option<String>,
    pub biography: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub active: Option<bool>,
    pub language: Option<String>,
    pub location_state: Option<String>,
    pub city: Option<String>,
    pub email_notification_frequency: Option<EmailNotificationFrequency>,
    /// Privileged; always discarded on create
    pub is_admin: Option<bool>,
    /// Privileged; always discarded on create
    pub is_moderator: Option<bool>,
    /// Relation managed by the OAuth consumer registry; always discarded on create
    pub consumers: Option<Vec<String>>,
    /// Relation managed by role assignment; always discarded on create
    pub roles: Option<Vec<u64>>,
}

impl UserDraft {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<PlaintextPassword>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Create payload after the lifecycle guard
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_in_provider: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<HashedPassword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub email_notification_frequency: EmailNotificationFrequency,
}

/// Update payload as submitted by a client.
///
/// There is deliberately no `password` field: the stored hash only changes
/// through `new_password`, and a raw `password` key is dropped on parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPatch {
    pub id_in_provider: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub new_password: Option<PlaintextPassword>,
    pub display_name: Option<String>,
    pub biography: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub active: Option<bool>,
    /// Passed through untouched; callers must authorize privilege changes
    pub is_admin: Option<bool>,
    /// Passed through untouched; callers must authorize privilege changes
    pub is_moderator: Option<bool>,
    pub language: Option<String>,
    pub location_state: Option<String>,
    pub city: Option<String>,
    pub email_notification_frequency: Option<EmailNotificationFrequency>,
}

impl UserPatch {
    pub fn with_new_password(mut self, password: impl Into<PlaintextPassword>) -> Self {
        self.new_password = Some(password.into());
        self
    }
}

/// Update payload after the lifecycle guard
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_in_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<HashedPassword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_moderator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notification_frequency: Option<EmailNotificationFrequency>,
}
