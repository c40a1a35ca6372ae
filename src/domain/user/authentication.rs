//! Outcome of checking a candidate password

use super::entity::User;

/// Result of an authentication attempt.
///
/// Failure is a value, not an error: an unknown email and a wrong password
/// produce the same `Failed` so callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Authentication {
    AuthenticatedAs(User),
    Failed,
}

impl Authentication {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::AuthenticatedAs(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::AuthenticatedAs(user) => Some(user),
            Self::Failed => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Self::AuthenticatedAs(user) => Some(user),
            Self::Failed => None,
        }
    }
}
