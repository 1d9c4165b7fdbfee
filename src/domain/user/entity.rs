//! User entity and related types

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::payload::{NewUser, UserChanges};
use crate::domain::role::RoleId;

/// Numeric user identifier assigned by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A password digest produced by the password hasher.
///
/// There is no way to build one from caller input other than hashing it or
/// loading a value that was previously persisted, so a plaintext secret never
/// ends up in the `password` column by accident.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a digest string. Only hashers and store loaders should call this.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// How often a user wants notification emails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmailNotificationFrequency {
    #[default]
    Instant,
    Daily,
    Weekly,
}

/// Stored user record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    /// Identifier at an external auth provider
    #[serde(skip_serializing_if = "Option::is_none")]
    id_in_provider: Option<String>,
    username: String,
    email: String,
    /// Never exposed in serialization
    #[serde(skip_serializing, default)]
    password: Option<HashedPassword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<NaiveDate>,
    active: bool,
    is_admin: bool,
    is_moderator: bool,
    language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    email_notification_frequency: EmailNotificationFrequency,
    roles: BTreeSet<RoleId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Store write counter; a whole-record write must carry the current one
    #[serde(skip_serializing, default)]
    revision: u64,
}

impl User {
    /// Materialize a guarded create payload under a store-assigned id
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id,
            id_in_provider: new_user.id_in_provider,
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            display_name: new_user.display_name,
            biography: new_user.biography,
            gender: new_user.gender,
            birth_date: new_user.birth_date,
            active: new_user.active,
            is_admin: false,
            is_moderator: false,
            language: new_user.language,
            location_state: new_user.location_state,
            city: new_user.city,
            email_notification_frequency: new_user.email_notification_frequency,
            roles: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn id_in_provider(&self) -> Option<&str> {
        self.id_in_provider.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> Option<&HashedPassword> {
        self.password.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn biography(&self) -> Option<&str> {
        self.biography.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_moderator(&self) -> bool {
        self.is_moderator
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn location_state(&self) -> Option<&str> {
        self.location_state.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn email_notification_frequency(&self) -> EmailNotificationFrequency {
        self.email_notification_frequency
    }

    pub fn roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }

    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Mutators

    /// Add a role membership. Returns false if the user already had it.
    pub fn add_role(&mut self, role: RoleId) -> bool {
        let added = self.roles.insert(role);
        if added {
            self.touch();
        }
        added
    }

    /// Apply a guarded update payload; absent fields are left untouched
    pub fn apply(&mut self, changes: UserChanges) {
        let UserChanges {
            id_in_provider,
            username,
            email,
            password,
            display_name,
            biography,
            gender,
            birth_date,
            active,
            is_admin,
            is_moderator,
            language,
            location_state,
            city,
            email_notification_frequency,
        } = changes;

        if let Some(v) = id_in_provider {
            self.id_in_provider = Some(v);
        }
        if let Some(v) = username {
            self.username = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = password {
            self.password = Some(v);
        }
        if let Some(v) = display_name {
            self.display_name = Some(v);
        }
        if let Some(v) = biography {
            self.biography = Some(v);
        }
        if let Some(v) = gender {
            self.gender = Some(v);
        }
        if let Some(v) = birth_date {
            self.birth_date = Some(v);
        }
        if let Some(v) = active {
            self.active = v;
        }
        if let Some(v) = is_admin {
            self.is_admin = v;
        }
        if let Some(v) = is_moderator {
            self.is_moderator = v;
        }
        if let Some(v) = language {
            self.language = v;
        }
        if let Some(v) = location_state {
            self.location_state = Some(v);
        }
        if let Some(v) = city {
            self.city = Some(v);
        }
        if let Some(v) = email_notification_frequency {
            self.email_notification_frequency = v;
        }

        self.touch();
    }

    /// Advance the revision. Called by the record store on every write.
    pub fn mark_written(&mut self) {
        self.revision += 1;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
