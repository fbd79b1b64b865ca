//! Retrying search client.
//!
//! One blocking search per call, retried on transient unavailability with a
//! strictly increasing linear backoff and no jitter. There is no pooling and
//! no deadline spanning attempts; callers needing parallelism fan out
//! externally with one client per thread of work.

use std::thread;

use tracing::{debug, warn};

use crate::config::DirectoryConfig;
use crate::connector::{DirectoryConnector, LdapConnector};
use crate::error::{DirectoryError, DirectoryResult};
use crate::record::RawRecord;

/// Directory search client with bounded retry.
///
/// Generic over the [`DirectoryConnector`] seam; `SearchClient<LdapConnector>`
/// is the production shape.
pub struct SearchClient<C> {
    connector: C,
    config: DirectoryConfig,
}

impl SearchClient<LdapConnector> {
    /// Creates a client backed by the production LDAP connector.
    #[must_use]
    pub fn new(config: DirectoryConfig) -> Self {
        let connector = LdapConnector::new(config.clone());
        Self { connector, config }
    }
}

impl<C: DirectoryConnector> SearchClient<C> {
    /// Creates a client over an arbitrary connector.
    #[must_use]
    pub fn with_connector(connector: C, config: DirectoryConfig) -> Self {
        Self { connector, config }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Returns the underlying connector.
    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Performs a subtree-scoped search, retrying transient failures.
    ///
    /// Each attempt opens a fresh connection. After failed attempt *i* the
    /// client sleeps `i * backoff_step`; once `max_attempts` attempts have
    /// failed it returns [`DirectoryError::ServiceUnavailable`]. Non-transient
    /// errors propagate immediately without retry.
    pub fn search(
        &self,
        base: &str,
        filter: &str,
        attrs: &[String],
    ) -> DirectoryResult<RawRecord> {
        let retry = &self.config.retry;
        for attempt in 1..=retry.max_attempts {
            match self.connector.search(base, filter, attrs) {
                Ok(record) => {
                    debug!(
                        base = %base,
                        filter = %filter,
                        entries = record.len(),
                        "directory search succeeded"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_transient() => {
                    let delay = retry.delay_after(attempt);
                    warn!(
                        base = %base,
                        attempt,
                        max_attempts = retry.max_attempts,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "directory unavailable, backing off"
                    );
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
        Err(DirectoryError::ServiceUnavailable {
            attempts: retry.max_attempts,
        })
    }
}
