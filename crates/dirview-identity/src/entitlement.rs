//! Service entitlement records and eligibility.
//!
//! Entitlements arrive from the directory as one JSON string per downstream
//! system. They are decoded into [`ServiceEntitlement`] at this boundary and
//! nowhere else. Eligibility looks only at `system` and `eligibility`;
//! `status` and `action` are owned by a caller-side policy layer together
//! with override-group handling.

use serde::{Deserialize, Serialize};

use crate::error::IdentityResult;

/// One service entitlement record as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntitlement {
    /// Downstream system the record applies to.
    pub system: String,

    /// Eligibility verdict (`yes`, `yesDelay`, `yesImmed`, or a negative
    /// vendor-specific value).
    pub eligibility: String,

    /// Provisioning status in the downstream system.
    #[serde(default)]
    pub status: String,

    /// Timestamp of the last change, in directory generalized time.
    #[serde(default, rename = "changeDate")]
    pub change_date: String,

    /// Downstream system's key for this person, when assigned.
    #[serde(default, rename = "foreignKey")]
    pub foreign_key: String,

    /// Pending provisioning action, when any.
    #[serde(default)]
    pub action: String,
}

impl ServiceEntitlement {
    /// Checks whether this record's eligibility value grants access.
    #[must_use]
    pub fn grants_access(&self) -> bool {
        matches!(self.eligibility.as_str(), "yes" | "yesDelay" | "yesImmed")
    }
}

/// Checks whether any entitlement record grants access to the named service.
///
/// The first record for the requested system that grants access
/// short-circuits the scan. Malformed JSON propagates as an error.
pub fn is_eligible(entitlements: &[String], service: &str) -> IdentityResult<bool> {
    for raw in entitlements {
        let record: ServiceEntitlement = serde_json::from_str(raw)?;
        if record.system == service && record.grants_access() {
            return Ok(true);
        }
    }
    Ok(false)
}
