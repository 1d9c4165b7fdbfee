//! Viewer-aware user projection

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::entity::{EmailNotificationFrequency, User, UserId};
use crate::domain::role::RoleId;

/// Type discriminator attached to every projected user
pub const USER_VIEW_TYPE: &str = "user";

/// Who is looking at a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated { id: UserId, is_admin: bool },
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    pub fn user(id: UserId) -> Self {
        Self::Authenticated {
            id,
            is_admin: false,
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self::Authenticated { id, is_admin: true }
    }

    /// Viewer context for a signed-in user record
    pub fn from_user(user: &User) -> Self {
        Self::Authenticated {
            id: user.id(),
            is_admin: user.is_admin(),
        }
    }

    /// Whether this viewer may see the private fields of `subject`
    pub fn can_see_private(&self, subject: UserId) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated { id, is_admin } => *is_admin || *id == subject,
        }
    }
}

/// Client-facing projection of a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_in_provider: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    pub is_admin: bool,
    pub is_moderator: bool,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub email_notification_frequency: EmailNotificationFrequency,
    pub roles: BTreeSet<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Project a stored user for `viewer`.
///
/// The password hash is never part of the view. The email is included only
/// for the user themself and for admins. An empty display name falls back to
/// the username.
pub fn project(user: &User, viewer: &Viewer) -> UserView {
    let email = viewer
        .can_see_private(user.id())
        .then(|| user.email().to_string());

    let display_name = match user.display_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => user.username().to_string(),
    };

    UserView {
        id: user.id(),
        id_in_provider: user.id_in_provider().map(str::to_string),
        username: user.username().to_string(),
        email,
        display_name,
        biography: user.biography().map(str::to_string),
        gender: user.gender().map(str::to_string),
        birth_date: user.birth_date(),
        active: user.is_active(),
        is_admin: user.is_admin(),
        is_moderator: user.is_moderator(),
        language: user.language().to_string(),
        location_state: user.location_state().map(str::to_string),
        city: user.city().map(str::to_string),
        email_notification_frequency: user.email_notification_frequency(),
        roles: user.roles().clone(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
        kind: USER_VIEW_TYPE,
    }
}
