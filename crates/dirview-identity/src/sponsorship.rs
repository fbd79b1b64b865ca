//! Sponsorship categorization for sponsored affiliates.
//!
//! Sub-typing is identifier-heuristic: third-party sponsorships are issued
//! `um<digits>` identifiers, and second-tier sponsorships carry entity ids in
//! the `99` block. The third-party pattern is checked first; that tie-break
//! order is fixed.

use crate::affiliation::AffiliationTier;

/// Sponsorship sub-type of a sponsored affiliate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SponsorshipType {
    /// Sponsored affiliate is not the highest affiliation.
    NotSponsored = 0,

    /// First-tier (default) sponsorship.
    TierOne = 1,

    /// Second-tier sponsorship (entity id in the `99` block).
    TierTwo = 2,

    /// Third-party sponsorship (`um<digits>` identifier).
    TierThree = 3,
}

impl SponsorshipType {
    /// Numeric form used by downstream systems.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Classifies a user's sponsorship from their highest affiliation and
/// identifier shape.
#[must_use]
pub fn classify(
    highest: AffiliationTier,
    uniqname: &str,
    entity_id: &str,
) -> SponsorshipType {
    if highest != AffiliationTier::SponsoredAffiliate {
        return SponsorshipType::NotSponsored;
    }
    if is_third_party_identifier(uniqname) {
        SponsorshipType::TierThree
    } else if entity_id.starts_with("99") {
        SponsorshipType::TierTwo
    } else {
        SponsorshipType::TierOne
    }
}

/// Matches identifiers of the form `um` followed by at least one digit.
fn is_third_party_identifier(uniqname: &str) -> bool {
    uniqname
        .strip_prefix("um")
        .is_some_and(|rest| rest.chars().next().is_some_and(|c| c.is_ascii_digit()))
}
