//! Connector seam between the search client and the wire protocol.
//!
//! [`DirectoryConnector`] is the only surface the rest of the system sees:
//! one blocking `search` per call. The production [`LdapConnector`] opens a
//! fresh connection for every search (bind, subtree search, unbind) and never
//! reuses connections across calls or retry attempts.

use ldap3::{LdapConn, LdapConnSettings, Scope, SearchEntry, SearchOptions, SearchResult};
use tracing::debug;

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::record::{AttrValue, RawEntry, RawRecord};

/// Abstract search primitive over the directory protocol.
///
/// Implementations issue one complete search per call and surface transient
/// unavailability as [`DirectoryError::Unavailable`] so the client's retry
/// loop can distinguish it from fatal failures.
pub trait DirectoryConnector {
    /// Performs a subtree-scoped search and returns the raw record.
    fn search(&self, base: &str, filter: &str, attrs: &[String]) -> DirectoryResult<RawRecord>;
}

/// Production connector speaking LDAP via a synchronous connection.
pub struct LdapConnector {
    config: DirectoryConfig,
}

impl LdapConnector {
    /// Creates a connector for the given configuration.
    #[must_use]
    pub fn new(config: DirectoryConfig) -> Self {
        Self { config }
    }

    /// Opens a fresh connection and binds as the service identity.
    fn open(&self) -> DirectoryResult<LdapConn> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.config.connect_timeout);

        let mut conn = LdapConn::with_settings(settings, &self.config.connection_url)
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;

        let result = conn
            .simple_bind(&self.config.bind_dn, &self.config.bind_secret)
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;

        match result.rc {
            0 => Ok(conn),
            49 => Err(DirectoryError::InvalidCredentials),
            51 | 52 => Err(DirectoryError::unavailable(format!(
                "bind refused with result code {}: {}",
                result.rc, result.text
            ))),
            rc => Err(DirectoryError::bind(format!(
                "result code {rc}: {}",
                result.text
            ))),
        }
    }
}

impl DirectoryConnector for LdapConnector {
    fn search(&self, base: &str, filter: &str, attrs: &[String]) -> DirectoryResult<RawRecord> {
        let mut conn = self.open()?;

        debug!(base = %base, filter = %filter, "issuing directory search");

        let search_result = conn
            .with_search_options(
                SearchOptions::new()
                    .sizelimit(self.config.size_limit)
                    .timelimit(self.config.time_limit),
            )
            .search(base, Scope::Subtree, filter, attrs.to_vec())
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;

        let SearchResult(entries, result) = search_result;
        let record = match result.rc {
            0 => Ok(entries
                .into_iter()
                .map(SearchEntry::construct)
                .map(raw_entry_from)
                .collect()),
            51 | 52 => Err(DirectoryError::unavailable(format!(
                "search refused with result code {}: {}",
                result.rc, result.text
            ))),
            rc => Err(DirectoryError::search(format!(
                "result code {rc}: {}",
                result.text
            ))),
        };

        // Fresh connection per call; close it regardless of the outcome.
        let _ = conn.unbind();

        record
    }
}

/// Converts a protocol search entry into the crate's raw record shape.
///
/// Text and binary attributes are merged into one byte-valued map; the
/// decoder owns all text conversion.
fn raw_entry_from(entry: SearchEntry) -> RawEntry {
    let mut attrs = std::collections::HashMap::new();
    for (name, values) in entry.attrs {
        attrs.insert(
            name,
            AttrValue::Seq(values.into_iter().map(String::into_bytes).collect()),
        );
    }
    for (name, values) in entry.bin_attrs {
        attrs.insert(name, AttrValue::Seq(values));
    }
    RawEntry::new(entry.dn, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn search_entry_conversion_merges_text_and_binary() {
        let mut text_attrs = HashMap::new();
        text_attrs.insert("uid".to_string(), vec!["jdoe".to_string()]);
        let mut bin_attrs = HashMap::new();
        bin_attrs.insert("photo".to_string(), vec![vec![0x01, 0x02]]);

        let entry = raw_entry_from(SearchEntry {
            dn: "uid=jdoe,ou=People,dc=example,dc=edu".to_string(),
            attrs: text_attrs,
            bin_attrs,
        });

        assert_eq!(entry.dn, "uid=jdoe,ou=People,dc=example,dc=edu");
        assert_eq!(
            entry.attrs.get("uid"),
            Some(&AttrValue::Seq(vec![b"jdoe".to_vec()]))
        );
        assert_eq!(
            entry.attrs.get("photo"),
            Some(&AttrValue::Seq(vec![vec![0x01, 0x02]]))
        );
    }
}
