//! Common test utilities and directory fixtures.

// Not every test target uses every fixture.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use dirview_ldap::{
    AttrValue, DirectoryConfig, DirectoryConnector, DirectoryResult, RawEntry, RawRecord,
    SearchClient,
};

pub const USERS_DN: &str = "ou=People,dc=example,dc=edu";
pub const GROUPS_DN: &str = "ou=Groups,dc=example,dc=edu";

/// In-memory connector routing `(base, filter)` to canned records.
///
/// Unknown queries resolve to an empty record, the directory's shape for
/// "no such entry". Every call is counted so tests can assert that
/// populate-once methods do no extra I/O.
pub struct MockConnector {
    routes: HashMap<(String, String), RawRecord>,
    calls: RefCell<u32>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            calls: RefCell::new(0),
        }
    }

    pub fn with_user(mut self, uniqname: &str, record: RawRecord) -> Self {
        self.routes
            .insert((USERS_DN.to_string(), format!("(uid={uniqname})")), record);
        self
    }

    pub fn with_group(mut self, name: &str, record: RawRecord) -> Self {
        self.routes
            .insert((GROUPS_DN.to_string(), format!("(cn={name})")), record);
        self
    }

    pub fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl DirectoryConnector for MockConnector {
    fn search(&self, base: &str, filter: &str, _attrs: &[String]) -> DirectoryResult<RawRecord> {
        *self.calls.borrow_mut() += 1;
        Ok(self
            .routes
            .get(&(base.to_string(), filter.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn test_config() -> DirectoryConfig {
    DirectoryConfig::builder()
        .connection_url("ldaps://directory.example.edu:636")
        .bind_dn("cn=provisioner,ou=Applications,o=services")
        .bind_secret("test-secret")
        .users_dn(USERS_DN)
        .groups_dn(GROUPS_DN)
        .mail_domain("example.edu")
        .build()
        .unwrap()
}

pub fn client(connector: MockConnector) -> SearchClient<MockConnector> {
    SearchClient::with_connector(connector, test_config())
}

fn seq(values: &[&str]) -> AttrValue {
    AttrValue::Seq(values.iter().map(|v| v.as_bytes().to_vec()).collect())
}

/// Builds a person record the way the directory returns one.
pub fn person(
    uniqname: &str,
    entity_id: &str,
    display_name: &str,
    roles: &[&str],
    entitlements: &[&str],
) -> RawRecord {
    let mut attrs = HashMap::new();
    attrs.insert("uid".to_string(), seq(&[uniqname]));
    attrs.insert("employeeNumber".to_string(), seq(&[entity_id]));
    attrs.insert("displayName".to_string(), seq(&[display_name]));
    attrs.insert("cn".to_string(), seq(&[display_name]));
    if !roles.is_empty() {
        attrs.insert("eduPersonAffiliation".to_string(), seq(roles));
    }
    if !entitlements.is_empty() {
        attrs.insert("eduPersonEntitlement".to_string(), seq(entitlements));
    }
    vec![RawEntry::new(
        format!("uid={uniqname},{USERS_DN}"),
        attrs,
    )]
}

/// Builds a group record with the given member DNs.
pub fn group(name: &str, member_dns: &[&str]) -> RawRecord {
    let mut attrs = HashMap::new();
    attrs.insert("cn".to_string(), seq(&[name]));
    if !member_dns.is_empty() {
        attrs.insert("member".to_string(), seq(member_dns));
    }
    vec![RawEntry::new(format!("cn={name},{GROUPS_DN}"), attrs)]
}

pub fn member_dn(uniqname: &str) -> String {
    format!("uid={uniqname},{USERS_DN}")
}

pub const FULL_ROLE_SET: &[&str] = &[
    "FacultyAA",
    "RegularStaffDBRN",
    "StudentFLNT",
    "TemporaryStaffFLNT",
    "SponsoredAffiliateAA",
    "Retiree",
    "AlumniAA",
];

pub const ELIGIBLE_ENTITLEMENTS: &[&str] = &[
    r#"{"system":"papercut","changeDate":"20141201050814Z","foreignKey":"","eligibility":"yesDelay","status":"role","action":""}"#,
    r#"{"system":"tdx","changeDate":"20200520160600Z","foreignKey":"5fd61fa7-035f-ea11-a81b-000d3a8e391e","eligibility":"yes","status":"active","action":""}"#,
    r#"{"system":"canvas","changeDate":"20200821155033Z","foreignKey":"327664","eligibility":"yesImmed","status":"active","action":""}"#,
    r#"{"system":"adobecc","changeDate":"20201017144315Z","foreignKey":"","eligibility":"cc","status":"","action":""}"#,
    r#"{"system":"enterprise","changeDate":"20210721193419Z","eligibility":"yes","status":"active","action":""}"#,
];

pub const INELIGIBLE_ENTITLEMENTS: &[&str] = &[
    r#"{"system":"box","changeDate":"20220727160206Z","foreignKey":"","eligibility":"yesImmed","status":"","action":"add"}"#,
    r#"{"system":"canvas","changeDate":"20220727160208Z","foreignKey":"746786","eligibility":"yesImmed","status":"active","action":""}"#,
    r#"{"system":"adobecc","changeDate":"20220727160206Z","foreignKey":"","eligibility":"acct","status":"","action":""}"#,
];
