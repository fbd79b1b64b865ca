//! Group entity.
//!
//! Unlike users, a missing group is a hard failure: group resolution is only
//! requested for groups the caller believes exist, and silently returning an
//! empty membership would mask provisioning bugs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use dirview_ldap::{decode, DirectoryConnector, RawRecord, SearchClient};

use crate::error::{IdentityError, IdentityResult};
use crate::user::{User, UserRecord};

/// A group resolved from the directory.
pub struct Group {
    /// Group name the entity was queried by.
    pub name: String,

    /// Always true once construction succeeds.
    pub exists: bool,

    /// Deduplicated member identifiers, in first-occurrence order.
    pub members: Vec<String>,

    raw_record: RawRecord,
    members_resolved: Option<Vec<User>>,
}

impl Group {
    /// Resolves a group by name with a single directory search.
    ///
    /// ## Errors
    ///
    /// Returns [`IdentityError::GroupNotFound`] when the directory has no
    /// entry for the group.
    pub fn resolve<C: DirectoryConnector>(
        client: &SearchClient<C>,
        name: &str,
    ) -> IdentityResult<Self> {
        let config = client.config();
        let filter = config.group_filter(name);
        let attrs = config.group_request_attributes();
        let raw_record = client.search(&config.groups_dn, &filter, &attrs)?;

        if raw_record.is_empty() {
            return Err(IdentityError::GroupNotFound(name.to_string()));
        }

        let members = parse_members(&raw_record, &config.member_attribute);
        debug!(group = %name, members = members.len(), "resolved group membership");

        Ok(Self {
            name: name.to_string(),
            exists: true,
            members,
            raw_record,
            members_resolved: None,
        })
    }

    /// The raw record this entity was built from.
    #[must_use]
    pub fn raw_record(&self) -> &RawRecord {
        &self.raw_record
    }

    /// Fully-resolved member users, empty until populated.
    #[must_use]
    pub fn members_resolved(&self) -> &[User] {
        self.members_resolved.as_deref().unwrap_or_default()
    }

    /// Resolves every member identifier to a [`User`], once.
    ///
    /// One directory round-trip per member; a directory-layer failure on any
    /// member aborts and leaves the field uncomputed.
    pub fn populate_members_resolved<C: DirectoryConnector>(
        &mut self,
        client: &SearchClient<C>,
    ) -> IdentityResult<&[User]> {
        if self.members_resolved.is_none() {
            let mut resolved = Vec::with_capacity(self.members.len());
            for member in &self.members {
                resolved.push(User::resolve(client, member)?);
            }
            self.members_resolved = Some(resolved);
        }
        Ok(self.members_resolved())
    }

    /// Flat snapshot for downstream serialization.
    #[must_use]
    pub fn to_record(&self) -> GroupRecord {
        GroupRecord {
            name: self.name.clone(),
            exists: self.exists,
            members: self.members.clone(),
            members_resolved: self
                .members_resolved()
                .iter()
                .map(User::to_record)
                .collect(),
        }
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("exists", &self.exists)
            .field("members", &self.members)
            .field(
                "members_resolved",
                &self.members_resolved.as_ref().map(Vec::len),
            )
            .finish_non_exhaustive()
    }
}

/// Parses the member attribute's DN values into deduplicated identifiers.
///
/// Each value is a DN whose first RDN is `uid=<identifier>`; values with a
/// different leading RDN are skipped.
fn parse_members(record: &RawRecord, member_attribute: &str) -> Vec<String> {
    let values = decode(record, member_attribute, false).into_vec();
    let mut seen = std::collections::HashSet::new();
    let mut members = Vec::new();
    for dn in values {
        if let Some(uid) = member_uid(&dn) {
            if seen.insert(uid.clone()) {
                members.push(uid);
            }
        }
    }
    members
}

/// Extracts the identifier from a member DN's leading `uid=` RDN.
fn member_uid(dn: &str) -> Option<String> {
    let first = dn.split(',').next()?.trim();
    let (attr, value) = first.split_once('=')?;
    if attr.trim().eq_ignore_ascii_case("uid") && !value.is_empty() {
        Some(value.to_string())
    } else {
        None
    }
}

/// Serializable flat view of a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group name.
    pub name: String,
    /// Whether the group exists (always true for constructed groups).
    pub exists: bool,
    /// Deduplicated member identifiers.
    pub members: Vec<String>,
    /// Resolved members, empty if never populated.
    pub members_resolved: Vec<UserRecord>,
}
