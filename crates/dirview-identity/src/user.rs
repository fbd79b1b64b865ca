//! User entity.
//!
//! A `User` is the snapshot of one directory search for a person. Identity
//! absence is recorded on the entity (`exists=false`, `errors` set) rather
//! than raised, so batch resolution keeps going past missing people.
//! Derived classification fields are computed lazily, each at most once.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dirview_ldap::{decode, DirectoryConnector, RawRecord, SearchClient};

use crate::affiliation::{AffiliationTier, PrecedenceTable};
use crate::entitlement;
use crate::error::IdentityResult;
use crate::sponsorship::{self, SponsorshipType};

/// A person resolved from the directory.
pub struct User {
    /// Identifier the user was queried by.
    pub name: String,

    /// Email derived from the identifier and the configured mail domain.
    ///
    /// Derived, not looked up: set even when the user does not exist.
    pub email: String,

    /// Institutional entity id, empty when the user does not exist.
    pub entity_id: String,

    /// Display name, empty when the user does not exist.
    pub display_name: String,

    /// Whether a directory entry was found.
    pub exists: bool,

    /// Human-readable description of the not-found condition, when any.
    pub errors: Option<String>,

    raw_record: RawRecord,
    affiliation_attribute: String,
    entitlement_attribute: String,
    affiliations: Option<Vec<String>>,
    highest_affiliation: Option<AffiliationTier>,
    service_entitlements: Option<Vec<String>>,
}

impl User {
    /// Resolves a user by identifier with a single directory search.
    ///
    /// Absence is not an error: the returned entity has `exists=false` and a
    /// description in `errors`. Only directory-layer failures (bind, search,
    /// retry exhaustion) return `Err`.
    pub fn resolve<C: DirectoryConnector>(
        client: &SearchClient<C>,
        uniqname: &str,
    ) -> IdentityResult<Self> {
        let config = client.config();
        let filter = config.user_filter(uniqname);
        let attrs = config.user_request_attributes();
        let raw_record = client.search(&config.users_dn, &filter, &attrs)?;

        let mut user = Self {
            name: uniqname.to_string(),
            email: format!("{uniqname}@{}", config.mail_domain),
            entity_id: String::new(),
            display_name: String::new(),
            exists: false,
            errors: None,
            raw_record,
            affiliation_attribute: config.affiliation_attribute.clone(),
            entitlement_attribute: config.entitlement_attribute.clone(),
            affiliations: None,
            highest_affiliation: None,
            service_entitlements: None,
        };

        if user.raw_record.is_empty() {
            debug!(uniqname = %uniqname, "no directory entry found for user");
            user.errors = Some(format!("no directory entry found for user {uniqname}"));
        } else {
            user.exists = true;
            user.entity_id =
                decode(&user.raw_record, &config.entity_id_attribute, true).into_scalar();
            user.display_name =
                decode(&user.raw_record, &config.display_name_attribute, true).into_scalar();
        }

        Ok(user)
    }

    /// The raw record this entity was built from.
    #[must_use]
    pub fn raw_record(&self) -> &RawRecord {
        &self.raw_record
    }

    /// Role tags, empty until populated.
    #[must_use]
    pub fn affiliations(&self) -> &[String] {
        self.affiliations.as_deref().unwrap_or_default()
    }

    /// Highest affiliation, `None` until populated.
    #[must_use]
    pub const fn highest_affiliation(&self) -> Option<AffiliationTier> {
        self.highest_affiliation
    }

    /// Raw JSON entitlement records, empty until populated.
    #[must_use]
    pub fn service_entitlements(&self) -> &[String] {
        self.service_entitlements.as_deref().unwrap_or_default()
    }

    /// Decodes the role attribute into `affiliations`, once.
    pub fn populate_affiliations(&mut self) {
        if self.affiliations.is_none() {
            let roles =
                decode(&self.raw_record, &self.affiliation_attribute, false).into_vec();
            self.affiliations = Some(roles);
        }
    }

    /// Computes the highest-precedence affiliation, once, using the default
    /// precedence table.
    pub fn populate_highest_affiliation(&mut self) -> AffiliationTier {
        if let Some(tier) = self.highest_affiliation {
            return tier;
        }
        self.populate_affiliations();
        let tier = PrecedenceTable::default().highest(self.affiliations());
        self.highest_affiliation = Some(tier);
        tier
    }

    /// Decodes the entitlement attribute into `service_entitlements`, once.
    ///
    /// ## Errors
    ///
    /// Returns [`IdentityError::EntitlementsUnconfigured`] when the decoded
    /// list is empty, typically because the bind identity lacks entitlement
    /// scope.
    /// The field stays uncomputed, so a later call retries the decode.
    ///
    /// [`IdentityError::EntitlementsUnconfigured`]: crate::error::IdentityError::EntitlementsUnconfigured
    pub fn populate_service_entitlements(&mut self) -> IdentityResult<()> {
        if self.service_entitlements.is_some() {
            return Ok(());
        }
        let records =
            decode(&self.raw_record, &self.entitlement_attribute, false).into_vec();
        if records.is_empty() {
            warn!(
                uniqname = %self.name,
                attribute = %self.entitlement_attribute,
                "directory returned no service entitlements"
            );
            return Err(crate::error::IdentityError::EntitlementsUnconfigured(
                self.name.clone(),
            ));
        }
        self.service_entitlements = Some(records);
        Ok(())
    }

    /// Checks eligibility for a named downstream service.
    ///
    /// Populates entitlements first if needed. Override groups are not
    /// consulted here; that policy layer is caller-side.
    pub fn check_service_entitlement(&mut self, service: &str) -> IdentityResult<bool> {
        self.populate_service_entitlements()?;
        entitlement::is_eligible(self.service_entitlements(), service)
    }

    /// Classifies the sponsorship sub-type, computing the highest
    /// affiliation first if needed.
    pub fn check_sponsorship_type(&mut self) -> SponsorshipType {
        let highest = self.populate_highest_affiliation();
        sponsorship::classify(highest, &self.name, &self.entity_id)
    }

    /// Flat snapshot for downstream serialization.
    ///
    /// Lazy fields that were never populated serialize as empty.
    #[must_use]
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            entity_id: self.entity_id.clone(),
            display_name: self.display_name.clone(),
            exists: self.exists,
            affiliations: self.affiliations().to_vec(),
            highest_affiliation: self
                .highest_affiliation
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            service_entitlements: self.service_entitlements().to_vec(),
            errors: self.errors.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("entity_id", &self.entity_id)
            .field("display_name", &self.display_name)
            .field("exists", &self.exists)
            .field("errors", &self.errors)
            .field("affiliations", &self.affiliations)
            .field("highest_affiliation", &self.highest_affiliation)
            .field("service_entitlements", &self.service_entitlements)
            .finish_non_exhaustive()
    }
}

/// Serializable flat view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier the user was queried by.
    pub name: String,
    /// Derived email.
    pub email: String,
    /// Institutional entity id.
    pub entity_id: String,
    /// Display name.
    pub display_name: String,
    /// Whether a directory entry was found.
    pub exists: bool,
    /// Role tags, empty if never populated.
    pub affiliations: Vec<String>,
    /// Highest affiliation tag, empty if never populated.
    pub highest_affiliation: String,
    /// Raw JSON entitlement records, empty if never populated.
    pub service_entitlements: Vec<String>,
    /// Human-readable not-found description, when any.
    pub errors: Option<String>,
}
