//! Resource ownership checks.
//!
//! Every mutable resource records the principal that created it. Reads are open
//! to any authenticated principal; updates and deletes are reserved for the
//! owner. The owner passed in must be the one currently persisted for the
//! resource, read at request time, never a value supplied by the client.

use std::fmt;

use crate::error::AuthError;
use crate::types::Principal;

/// Operation being attempted on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Update,
    Delete,
}

impl Action {
    /// Returns `true` if the action changes the resource.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The principal is not the resource's owner.
    NotOwner,
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if access is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a `Result` for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotOwner`] when denied.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::NotOwner) => Err(AuthError::NotOwner),
        }
    }
}

/// Decides whether `principal` may perform `action` on a resource owned by
/// `owner_id`.
#[must_use]
pub fn authorize(principal: &Principal, owner_id: &str, action: Action) -> AccessDecision {
    if !action.is_mutating() || principal.id == owner_id {
        return AccessDecision::Allow;
    }

    tracing::debug!(
        user_id = %principal.id,
        owner_id = %owner_id,
        action = %action,
        "Ownership check denied"
    );
    AccessDecision::Deny(DenyReason::NotOwner)
}
