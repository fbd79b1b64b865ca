//! Entity-layer error types.
//!
//! User absence is deliberately NOT an error here: a missing user is recorded
//! on the entity ([`crate::user::User::errors`]) so batch callers can keep
//! going. A missing group aborts resolution, and that asymmetry is a product
//! decision, not an accident.

use dirview_ldap::DirectoryError;
use thiserror::Error;

/// Errors raised by the entity layer.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The group does not exist in the directory.
    #[error("group {0} does not exist in the directory")]
    GroupNotFound(String),

    /// The directory returned no entitlement data for the queried identity.
    ///
    /// Warning-level: distinct from "zero eligible entitlements". Usually
    /// means the bind identity lacks entitlement scope.
    #[error("directory returned no service entitlements for {0}; check that the bind identity has entitlement scope")]
    EntitlementsUnconfigured(String),

    /// A service entitlement record was not valid JSON.
    #[error("malformed service entitlement record: {0}")]
    Entitlement(#[from] serde_json::Error),

    /// Failure in the underlying directory access layer.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl IdentityError {
    /// Checks whether this is the warning-level unconfigured-entitlement
    /// signal, which callers may treat as non-fatal.
    #[must_use]
    pub const fn is_entitlements_unconfigured(&self) -> bool {
        matches!(self, Self::EntitlementsUnconfigured(_))
    }

    /// Checks whether this is a group-absence failure.
    #[must_use]
    pub const fn is_group_not_found(&self) -> bool {
        matches!(self, Self::GroupNotFound(_))
    }
}

/// Result type for entity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
