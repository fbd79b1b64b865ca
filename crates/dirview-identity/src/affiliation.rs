//! Affiliation precedence.
//!
//! Role attributes arrive as suffixed tag variants (`FacultyAA`,
//! `RegularStaffDBRN`), so the default matching mode is substring
//! containment. The matching strategy lives entirely behind
//! [`PrecedenceTable::highest`] so a deployment whose tag vocabulary makes
//! substring matching unsafe can switch to exact matching without touching
//! callers.

use serde::{Deserialize, Serialize};

/// Institutional affiliation tiers, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffiliationTier {
    /// Faculty appointment.
    Faculty,
    /// Regular (permanent) staff.
    RegularStaff,
    /// Enrolled student.
    Student,
    /// Temporary staff.
    TemporaryStaff,
    /// Sponsored affiliate.
    SponsoredAffiliate,
    /// Retiree.
    Retiree,
    /// Alumni.
    Alumni,
    /// No recognized affiliation.
    #[serde(rename = "NA")]
    Na,
}

impl AffiliationTier {
    /// The tag keyword this tier matches against.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Faculty => "Faculty",
            Self::RegularStaff => "RegularStaff",
            Self::Student => "Student",
            Self::TemporaryStaff => "TemporaryStaff",
            Self::SponsoredAffiliate => "SponsoredAffiliate",
            Self::Retiree => "Retiree",
            Self::Alumni => "Alumni",
            Self::Na => "NA",
        }
    }
}

impl std::fmt::Display for AffiliationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tier keyword is matched against role tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Keyword contained anywhere in the space-joined role tags.
    ///
    /// Matches suffixed variants like `FacultyAA`; a tag sharing a keyword
    /// for an unrelated reason would also match.
    Substring,

    /// Keyword equal to a whole role tag.
    Exact,
}

/// Ordered precedence table of (tier, match mode) entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    entries: Vec<(AffiliationTier, MatchMode)>,
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (AffiliationTier::Faculty, MatchMode::Substring),
                (AffiliationTier::RegularStaff, MatchMode::Substring),
                (AffiliationTier::Student, MatchMode::Substring),
                (AffiliationTier::TemporaryStaff, MatchMode::Substring),
                (AffiliationTier::SponsoredAffiliate, MatchMode::Substring),
                (AffiliationTier::Retiree, MatchMode::Substring),
                (AffiliationTier::Alumni, MatchMode::Substring),
            ],
        }
    }
}

impl PrecedenceTable {
    /// Creates a table with custom entries, checked in order.
    #[must_use]
    pub fn new(entries: Vec<(AffiliationTier, MatchMode)>) -> Self {
        Self { entries }
    }

    /// Returns the highest-precedence tier matched by the given role tags,
    /// or [`AffiliationTier::Na`] when none match.
    #[must_use]
    pub fn highest(&self, roles: &[String]) -> AffiliationTier {
        let joined = roles.join(" ");
        for (tier, mode) in &self.entries {
            let hit = match mode {
                MatchMode::Substring => joined.contains(tier.as_str()),
                MatchMode::Exact => roles.iter().any(|r| r == tier.as_str()),
            };
            if hit {
                return *tier;
            }
        }
        AffiliationTier::Na
    }
}
