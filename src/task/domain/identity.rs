//! Caller identity passed explicitly into every task operation.

use super::UserId;
use serde::{Deserialize, Serialize};

/// User resolved by the access boundary for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    id: UserId,
    username: String,
}

impl UserIdentity {
    /// Creates an identity from a resolved user record.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Caller of a task operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requester {
    /// No identity was resolved for the request.
    Anonymous,
    /// An authenticated user.
    Authenticated(UserIdentity),
}

impl Requester {
    /// Returns the identity when the requester is authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns the authenticated user identifier, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity.id),
        }
    }
}

impl From<UserIdentity> for Requester {
    fn from(identity: UserIdentity) -> Self {
        Self::Authenticated(identity)
    }
}
