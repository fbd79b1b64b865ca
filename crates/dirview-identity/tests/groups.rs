//! Group resolution and member fan-out over a scripted connector.

mod common;

use common::{
    client, group, member_dn, person, MockConnector, ELIGIBLE_ENTITLEMENTS, FULL_ROLE_SET,
};
use dirview_identity::{Group, IdentityError, User};

fn group_client() -> dirview_ldap::SearchClient<MockConnector> {
    let connector = MockConnector::new()
        .with_group(
            "test-group",
            group(
                "test-group",
                &[
                    &member_dn("nemcardf"),
                    &member_dn("nemcardrs"),
                    &member_dn("nemcarda"),
                ],
            ),
        )
        .with_user(
            "nemcardf",
            person(
                "nemcardf",
                "00000000",
                "Natalie Emcard",
                FULL_ROLE_SET,
                ELIGIBLE_ENTITLEMENTS,
            ),
        )
        .with_user(
            "nemcardrs",
            person(
                "nemcardrs",
                "00000001",
                "Reg Staff",
                &["RegularStaffDBRN"],
                ELIGIBLE_ENTITLEMENTS,
            ),
        )
        .with_user(
            "nemcarda",
            person(
                "nemcarda",
                "00000002",
                "Alum Emcard",
                &["AlumniAA"],
                ELIGIBLE_ENTITLEMENTS,
            ),
        );
    client(connector)
}

#[test]
fn resolution_parses_members() {
    let client = group_client();

    let group = Group::resolve(&client, "test-group").unwrap();

    assert!(group.exists);
    assert_eq!(group.name, "test-group");
    assert_eq!(group.members, vec!["nemcardf", "nemcardrs", "nemcarda"]);
    assert_eq!(group.raw_record().len(), 1);
}

#[test]
fn missing_group_is_a_hard_failure() {
    let client = client(MockConnector::new());

    let err = Group::resolve(&client, "no-such-group").unwrap_err();

    assert!(err.is_group_not_found());
    assert!(matches!(err, IdentityError::GroupNotFound(name) if name == "no-such-group"));
}

#[test]
fn duplicate_member_dns_are_deduplicated() {
    let dn = member_dn("nemcardf");
    let connector = MockConnector::new().with_group(
        "dup-group",
        group("dup-group", &[&dn, &member_dn("nemcardrs"), &dn]),
    );
    let client = client(connector);

    let group = Group::resolve(&client, "dup-group").unwrap();

    assert_eq!(group.members, vec!["nemcardf", "nemcardrs"]);
}

#[test]
fn memberless_group_resolves_empty() {
    let connector = MockConnector::new().with_group("empty-group", group("empty-group", &[]));
    let client = client(connector);

    let group = Group::resolve(&client, "empty-group").unwrap();

    assert!(group.members.is_empty());
    assert!(group.members_resolved().is_empty());
}

#[test]
fn member_resolution_issues_one_search_per_member() {
    let client = group_client();
    let mut group = Group::resolve(&client, "test-group").unwrap();
    let calls_after_group = client.connector().calls();

    let resolved: Vec<String> = group
        .populate_members_resolved(&client)
        .unwrap()
        .iter()
        .map(|u| u.name.clone())
        .collect();

    assert_eq!(resolved, vec!["nemcardf", "nemcardrs", "nemcarda"]);
    assert_eq!(
        client.connector().calls(),
        calls_after_group + group.members.len() as u32
    );
}

#[test]
fn member_resolution_populates_once() {
    let client = group_client();
    let mut group = Group::resolve(&client, "test-group").unwrap();

    group.populate_members_resolved(&client).unwrap();
    let calls_after_first = client.connector().calls();

    // Second call is a no-op with no additional directory I/O.
    group.populate_members_resolved(&client).unwrap();
    assert_eq!(client.connector().calls(), calls_after_first);
    assert_eq!(group.members_resolved().len(), 3);
}

#[test]
fn unknown_members_resolve_as_missing_users() {
    let connector = MockConnector::new().with_group(
        "stale-group",
        group("stale-group", &[&member_dn("departed")]),
    );
    let client = client(connector);
    let mut group = Group::resolve(&client, "stale-group").unwrap();

    let resolved = group.populate_members_resolved(&client).unwrap();

    assert_eq!(resolved.len(), 1);
    assert!(!resolved[0].exists);
    assert!(resolved[0].errors.is_some());
}

#[test]
fn record_snapshot_serializes_members() {
    let client = group_client();
    let mut group = Group::resolve(&client, "test-group").unwrap();
    group.populate_members_resolved(&client).unwrap();

    let record = group.to_record();
    assert_eq!(record.members_resolved.len(), 3);
    assert!(record.members_resolved.iter().all(|m| m.exists));

    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"members\":[\"nemcardf\",\"nemcardrs\",\"nemcarda\"]"));
}

#[test]
fn resolved_members_classify_independently() {
    let client = group_client();
    let mut group = Group::resolve(&client, "test-group").unwrap();
    group.populate_members_resolved(&client).unwrap();

    // Entities are independent snapshots; classifying one member must not
    // require or affect the others.
    let mut faculty = User::resolve(&client, "nemcardf").unwrap();
    assert_eq!(
        faculty.populate_highest_affiliation().to_string(),
        "Faculty"
    );
}
