//! Directory client configuration.
//!
//! Connection URLs must use `ldaps://`. Plain `ldap://` transmits the bind
//! secret in cleartext and is rejected at build time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Retry policy for transient directory unavailability.
///
/// Backoff is linear and strictly increasing: after failed attempt *i* the
/// client sleeps `i * backoff_step` before the next attempt. There is no
/// jitter and no deadline spanning attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of search attempts before giving up.
    pub max_attempts: u32,

    /// Base unit of the linear backoff schedule.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Returns the sleep duration after the given failed attempt (1-based).
    ///
    /// With the default policy this yields 5s, 10s, 15s for attempts 1-3.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Configuration for the directory search client.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    // === Connection ===
    /// Directory server URL (must be `ldaps://`).
    pub connection_url: String,

    /// Bind DN of the service identity.
    pub bind_dn: String,

    /// Bind secret for the service identity.
    #[serde(skip_serializing)]
    pub bind_secret: String,

    // === Directory structure ===
    /// Base DN for user searches.
    pub users_dn: String,

    /// Base DN for group searches.
    pub groups_dn: String,

    /// Mail domain used to derive a user's email from their identifier.
    pub mail_domain: String,

    // === Attributes ===
    /// Attribute naming a user entry (the identifier attribute).
    pub uid_attribute: String,

    /// Attribute naming a group entry.
    pub group_name_attribute: String,

    /// Attribute carrying the institutional entity id.
    pub entity_id_attribute: String,

    /// Attribute carrying the display name.
    pub display_name_attribute: String,

    /// Multi-valued attribute carrying institutional role tags.
    pub affiliation_attribute: String,

    /// Multi-valued attribute carrying JSON service-entitlement records.
    ///
    /// Operational in most deployments, so it is requested explicitly in
    /// addition to `*`.
    pub entitlement_attribute: String,

    /// Multi-valued attribute carrying group member DNs.
    pub member_attribute: String,

    // === Limits ===
    /// Connect timeout for each fresh connection.
    pub connect_timeout: Duration,

    /// Server-side time limit per search, in seconds.
    pub time_limit: i32,

    /// Server-side result-size cap per search.
    pub size_limit: i32,

    /// Retry policy for transient unavailability.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("connection_url", &self.connection_url)
            .field("bind_dn", &self.bind_dn)
            .field("bind_secret", &"***REDACTED***")
            .field("users_dn", &self.users_dn)
            .field("groups_dn", &self.groups_dn)
            .field("mail_domain", &self.mail_domain)
            .field("uid_attribute", &self.uid_attribute)
            .field("group_name_attribute", &self.group_name_attribute)
            .field("entity_id_attribute", &self.entity_id_attribute)
            .field("display_name_attribute", &self.display_name_attribute)
            .field("affiliation_attribute", &self.affiliation_attribute)
            .field("entitlement_attribute", &self.entitlement_attribute)
            .field("member_attribute", &self.member_attribute)
            .field("connect_timeout", &self.connect_timeout)
            .field("time_limit", &self.time_limit)
            .field("size_limit", &self.size_limit)
            .field("retry", &self.retry)
            .finish()
    }
}

impl DirectoryConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> DirectoryConfigBuilder {
        DirectoryConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DirectoryResult<()> {
        let url = self.connection_url.to_lowercase();
        if !url.starts_with("ldaps://") {
            return Err(DirectoryError::config(
                "connection_url must use the ldaps:// scheme",
            ));
        }
        if url.len() <= "ldaps://".len() {
            return Err(DirectoryError::config("connection_url is missing a host"));
        }
        if self.bind_dn.is_empty() {
            return Err(DirectoryError::config("bind_dn cannot be empty"));
        }
        if self.users_dn.is_empty() {
            return Err(DirectoryError::config("users_dn cannot be empty"));
        }
        if self.groups_dn.is_empty() {
            return Err(DirectoryError::config("groups_dn cannot be empty"));
        }
        if self.mail_domain.is_empty() {
            return Err(DirectoryError::config("mail_domain cannot be empty"));
        }
        if self.retry.max_attempts == 0 {
            return Err(DirectoryError::config("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Builds the search filter locating a user by identifier.
    #[must_use]
    pub fn user_filter(&self, uniqname: &str) -> String {
        format!("({}={})", self.uid_attribute, escape_filter_value(uniqname))
    }

    /// Builds the search filter locating a group by name.
    #[must_use]
    pub fn group_filter(&self, name: &str) -> String {
        format!(
            "({}={})",
            self.group_name_attribute,
            escape_filter_value(name)
        )
    }

    /// Attribute list requested for user searches.
    ///
    /// `*` does not cover operational attributes, so the derived-field
    /// attributes are requested by name as well.
    #[must_use]
    pub fn user_request_attributes(&self) -> Vec<String> {
        vec![
            "*".to_string(),
            self.entitlement_attribute.clone(),
            self.entity_id_attribute.clone(),
            self.display_name_attribute.clone(),
            self.affiliation_attribute.clone(),
        ]
    }

    /// Attribute list requested for group searches.
    #[must_use]
    pub fn group_request_attributes(&self) -> Vec<String> {
        vec!["*".to_string()]
    }
}

/// Escapes special characters in LDAP filter values (RFC 4515).
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

/// Builder for [`DirectoryConfig`].
#[derive(Debug, Default)]
pub struct DirectoryConfigBuilder {
    connection_url: Option<String>,
    bind_dn: Option<String>,
    bind_secret: Option<String>,
    users_dn: Option<String>,
    groups_dn: Option<String>,
    mail_domain: Option<String>,
    uid_attribute: Option<String>,
    group_name_attribute: Option<String>,
    entity_id_attribute: Option<String>,
    display_name_attribute: Option<String>,
    affiliation_attribute: Option<String>,
    entitlement_attribute: Option<String>,
    member_attribute: Option<String>,
    connect_timeout: Option<Duration>,
    time_limit: Option<i32>,
    size_limit: Option<i32>,
    retry: Option<RetryPolicy>,
}

impl DirectoryConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL (must be `ldaps://`).
    #[must_use]
    pub fn connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = Some(url.into());
        self
    }

    /// Sets the service identity bind DN.
    #[must_use]
    pub fn bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.bind_dn = Some(dn.into());
        self
    }

    /// Sets the service identity bind secret.
    #[must_use]
    pub fn bind_secret(mut self, secret: impl Into<String>) -> Self {
        self.bind_secret = Some(secret.into());
        self
    }

    /// Sets the base DN for user searches.
    #[must_use]
    pub fn users_dn(mut self, dn: impl Into<String>) -> Self {
        self.users_dn = Some(dn.into());
        self
    }

    /// Sets the base DN for group searches.
    #[must_use]
    pub fn groups_dn(mut self, dn: impl Into<String>) -> Self {
        self.groups_dn = Some(dn.into());
        self
    }

    /// Sets the mail domain used for derived user emails.
    #[must_use]
    pub fn mail_domain(mut self, domain: impl Into<String>) -> Self {
        self.mail_domain = Some(domain.into());
        self
    }

    /// Sets the user identifier attribute.
    #[must_use]
    pub fn uid_attribute(mut self, attr: impl Into<String>) -> Self {
        self.uid_attribute = Some(attr.into());
        self
    }

    /// Sets the group name attribute.
    #[must_use]
    pub fn group_name_attribute(mut self, attr: impl Into<String>) -> Self {
        self.group_name_attribute = Some(attr.into());
        self
    }

    /// Sets the entity id attribute.
    #[must_use]
    pub fn entity_id_attribute(mut self, attr: impl Into<String>) -> Self {
        self.entity_id_attribute = Some(attr.into());
        self
    }

    /// Sets the display name attribute.
    #[must_use]
    pub fn display_name_attribute(mut self, attr: impl Into<String>) -> Self {
        self.display_name_attribute = Some(attr.into());
        self
    }

    /// Sets the institutional role attribute.
    #[must_use]
    pub fn affiliation_attribute(mut self, attr: impl Into<String>) -> Self {
        self.affiliation_attribute = Some(attr.into());
        self
    }

    /// Sets the service entitlement attribute.
    #[must_use]
    pub fn entitlement_attribute(mut self, attr: impl Into<String>) -> Self {
        self.entitlement_attribute = Some(attr.into());
        self
    }

    /// Sets the group member attribute.
    #[must_use]
    pub fn member_attribute(mut self, attr: impl Into<String>) -> Self {
        self.member_attribute = Some(attr.into());
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the server-side time limit per search, in seconds.
    #[must_use]
    pub const fn time_limit(mut self, secs: i32) -> Self {
        self.time_limit = Some(secs);
        self
    }

    /// Sets the server-side result-size cap per search.
    #[must_use]
    pub const fn size_limit(mut self, limit: i32) -> Self {
        self.size_limit = Some(limit);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if a required field is missing or the connection URL
    /// does not use `ldaps://`.
    pub fn build(self) -> DirectoryResult<DirectoryConfig> {
        let config = DirectoryConfig {
            connection_url: self
                .connection_url
                .ok_or_else(|| DirectoryError::config("connection_url is required"))?,
            bind_dn: self
                .bind_dn
                .ok_or_else(|| DirectoryError::config("bind_dn is required"))?,
            bind_secret: self
                .bind_secret
                .ok_or_else(|| DirectoryError::config("bind_secret is required"))?,
            users_dn: self
                .users_dn
                .ok_or_else(|| DirectoryError::config("users_dn is required"))?,
            groups_dn: self
                .groups_dn
                .ok_or_else(|| DirectoryError::config("groups_dn is required"))?,
            mail_domain: self
                .mail_domain
                .ok_or_else(|| DirectoryError::config("mail_domain is required"))?,
            uid_attribute: self.uid_attribute.unwrap_or_else(|| "uid".to_string()),
            group_name_attribute: self
                .group_name_attribute
                .unwrap_or_else(|| "cn".to_string()),
            entity_id_attribute: self
                .entity_id_attribute
                .unwrap_or_else(|| "employeeNumber".to_string()),
            display_name_attribute: self
                .display_name_attribute
                .unwrap_or_else(|| "displayName".to_string()),
            affiliation_attribute: self
                .affiliation_attribute
                .unwrap_or_else(|| "eduPersonAffiliation".to_string()),
            entitlement_attribute: self
                .entitlement_attribute
                .unwrap_or_else(|| "eduPersonEntitlement".to_string()),
            member_attribute: self.member_attribute.unwrap_or_else(|| "member".to_string()),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(60)),
            time_limit: self.time_limit.unwrap_or(60),
            size_limit: self.size_limit.unwrap_or(100),
            retry: self.retry.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
