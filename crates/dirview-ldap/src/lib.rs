//! # dirview-ldap
//!
//! Directory access layer for dirview.
//!
//! This crate provides a retrying, subtree-scoped search primitive over an
//! enterprise LDAP directory, plus the raw record model and attribute
//! decoding shared by the entity layer. It is read-only by design: no add,
//! modify, or delete operations are exposed.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod record;

pub use client::SearchClient;
pub use config::{DirectoryConfig, DirectoryConfigBuilder, RetryPolicy};
pub use connector::{DirectoryConnector, LdapConnector};
pub use error::{DirectoryError, DirectoryResult};
pub use record::{decode, AttrValue, Decoded, RawEntry, RawRecord};
