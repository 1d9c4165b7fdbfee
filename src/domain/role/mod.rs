//! Role domain
//!
//! Roles are named permission groupings. Membership is many-to-many and is
//! stored on the user side as a set of role ids.

mod entity;

pub use entity::{Role, RoleId};
