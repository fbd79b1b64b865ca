//! # dirview-identity
//!
//! Directory entities and the business classification rules derived from
//! them: affiliation precedence, service-entitlement eligibility, and
//! sponsorship categorization.
//!
//! Entities are immutable snapshots of one directory search, except for
//! explicit lazy-population calls which compute each derived field at most
//! once. Population takes `&mut self`, so concurrent population of a single
//! instance is rejected at compile time; callers wanting parallel resolution
//! fan out across instances.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod affiliation;
pub mod entitlement;
pub mod error;
pub mod group;
pub mod sponsorship;
pub mod user;

pub use affiliation::{AffiliationTier, MatchMode, PrecedenceTable};
pub use entitlement::{is_eligible, ServiceEntitlement};
pub use error::{IdentityError, IdentityResult};
pub use group::{Group, GroupRecord};
pub use sponsorship::{classify, SponsorshipType};
pub use user::{User, UserRecord};
