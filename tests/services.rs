//! Service deployment, charm binding and lookups.

mod support;

use std::thread;

use mstate_rust::{
    CharmMeta, DocumentStore, ErrorKind, InMemoryDocumentStore, Operation, Selector, State,
    StateConfig,
};
use support::{add_charm, add_charm_revision, charm_url, deploy, new_state};

#[test]
fn deployed_service_is_found_by_name() {
    let (st, _) = new_state();
    let charm = add_charm(&st, "wordpress", false);
    let service = st.add_service("wordpress", &charm).unwrap();
    assert_eq!(service.name(), "wordpress");
    assert_eq!(service.to_string(), "wordpress");

    let found = st.service("wordpress").unwrap();
    assert_eq!(found.name(), "wordpress");
    assert_eq!(found.charm_url().unwrap(), charm_url("wordpress", 1));
    assert_eq!(found.charm().unwrap(), charm);
}

#[test]
fn deploying_twice_fails() {
    let (st, _) = new_state();
    let charm = add_charm(&st, "wordpress", false);
    st.add_service("wordpress", &charm).unwrap();

    let err = st.add_service("wordpress", &charm).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.operation(), Operation::AddService);
    assert!(err.to_string().starts_with(r#"can't add service "wordpress": "#));
}

#[test]
fn invalid_service_names_are_rejected() {
    let (st, _) = new_state();
    let charm = add_charm(&st, "wordpress", false);
    for bad in ["WordPress", "wordpress/0", "2wp", ""] {
        let err = st.add_service(bad, &charm).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName, "{bad}");
    }
    assert!(st.all_services().unwrap().is_empty());
}

#[test]
fn missing_service_is_not_found() {
    let (st, _) = new_state();
    let err = st.service("ghost").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), r#"can't get service "ghost": not found"#);
}

#[test]
fn all_services_lists_every_deploy() {
    let (st, _) = new_state();
    deploy(&st, "wordpress", false);
    deploy(&st, "mysql", false);
    deploy(&st, "logging", true);

    let mut names: Vec<String> = st
        .all_services()
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["logging", "mysql", "wordpress"]);
}

#[test]
fn set_charm_url_round_trips() {
    let (st, _) = new_state();
    let wordpress = deploy(&st, "wordpress", false);
    let upgraded = add_charm_revision(&st, "wordpress", 2, false);

    wordpress.set_charm_url(upgraded.url()).unwrap();
    assert_eq!(&wordpress.charm_url().unwrap(), upgraded.url());
    assert_eq!(wordpress.charm().unwrap(), upgraded);

    // Setting the URL already in place is fine too.
    wordpress.set_charm_url(upgraded.url()).unwrap();
    assert_eq!(&wordpress.charm_url().unwrap(), upgraded.url());
}

#[test]
fn charm_url_changes_are_last_write_wins() {
    let (_, store) = new_state();
    let first = State::open(store.clone(), StateConfig::default().with_controller("controller-1"));
    let second = State::open(store.clone(), StateConfig::default().with_controller("controller-2"));

    deploy(&first, "wordpress", false);
    let rev2 = add_charm_revision(&first, "wordpress", 2, false);
    let rev3 = add_charm_revision(&first, "wordpress", 3, false);

    let a = first.service("wordpress").unwrap();
    let b = second.service("wordpress").unwrap();
    a.set_charm_url(rev3.url()).unwrap();
    b.set_charm_url(rev2.url()).unwrap();

    // No version check: the later write downgrades the service.
    assert_eq!(&a.charm_url().unwrap(), rev2.url());
    assert_eq!(&b.charm_url().unwrap(), rev2.url());
}

#[test]
fn racing_charm_url_changes_both_succeed() {
    let (st, _) = new_state();
    deploy(&st, "wordpress", false);
    let rev2 = add_charm_revision(&st, "wordpress", 2, false);
    let rev3 = add_charm_revision(&st, "wordpress", 3, false);

    let handles: Vec<_> = [rev2.url().clone(), rev3.url().clone()]
        .into_iter()
        .map(|url| {
            let st = st.clone();
            thread::spawn(move || st.service("wordpress").unwrap().set_charm_url(&url))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let winner = st.service("wordpress").unwrap().charm_url().unwrap();
    assert!(&winner == rev2.url() || &winner == rev3.url());
}

#[test]
fn charm_url_of_vanished_service_is_not_found() {
    let (st, store) = new_state();
    let wordpress = deploy(&st, "wordpress", false);
    store
        .remove("services", &Selector::id("wordpress"))
        .unwrap();

    let err = wordpress.charm_url().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.operation(), Operation::CharmUrl);
    assert_eq!(
        err.to_string(),
        r#"can't get the charm URL of service "wordpress": not found"#
    );

    let err = wordpress.set_charm_url(&charm_url("wordpress", 2)).unwrap_err();
    assert!(err.is_no_match());
    assert!(err
        .to_string()
        .starts_with(r#"can't set the charm URL of service "wordpress": "#));

    let err = wordpress.add_unit().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.operation(), Operation::AddUnit);
    assert!(err.to_string().starts_with(
        r#"can't add unit to service "wordpress": can't get the charm URL of service "wordpress""#
    ));
}

#[test]
fn unknown_charm_is_not_found() {
    let (st, _) = new_state();
    let err = st.charm(&charm_url("nothing", 1)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.operation(), Operation::Charm);
    assert_eq!(
        err.to_string(),
        r#"can't get charm "cs:precise/nothing-1": not found"#
    );
}

#[test]
fn malformed_charm_record_is_load_error() {
    let (st, store) = new_state();
    store
        .insert(
            "charms",
            serde_json::json!({"_id": "cs:precise/broken-1", "meta": "not an object"}),
        )
        .unwrap();

    let err = st.charm(&charm_url("broken", 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoadError);
}

#[test]
fn adding_a_charm_twice_fails() {
    let (st, _) = new_state();
    add_charm(&st, "wordpress", false);
    let err = st
        .add_charm(
            CharmMeta::new("wordpress"),
            &charm_url("wordpress", 1),
            "http://bundles.example.com/other",
            "sha",
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn charm_fields_survive_storage() {
    let (st, _) = new_state();
    let charm = add_charm(&st, "logging", true);
    let loaded = st.charm(charm.url()).unwrap();
    assert!(loaded.is_subordinate());
    assert_eq!(loaded.meta().name, "logging");
    assert_eq!(loaded.meta().summary, "logging test charm");
    assert_eq!(loaded.bundle_url(), "http://bundles.example.com/logging-1");
    assert_eq!(loaded.bundle_sha256(), "sha256-logging-1");
}

#[test]
fn service_record_shape() {
    let (st, store) = new_state();
    deploy(&st, "wordpress", false);
    let doc = store.find_one("services", &Selector::id("wordpress")).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({"_id": "wordpress", "charmurl": "cs:precise/wordpress-1"})
    );
}

#[test]
fn configured_collections_are_used() {
    let store = InMemoryDocumentStore::new();
    let config = StateConfig::from_toml_str(
        r#"
        controller = "controller-7"

        [collections]
        services = "juju_services"
        units = "juju_units"
        "#,
    )
    .unwrap();
    let st = State::open(store.clone(), config);
    assert_eq!(st.controller(), "controller-7");

    let wordpress = deploy(&st, "wordpress", false);
    wordpress.add_unit().unwrap();

    assert_eq!(store.len("juju_services").unwrap(), 1);
    assert_eq!(store.len("juju_units").unwrap(), 1);
    assert!(store.is_empty("units").unwrap());
    assert_eq!(store.len("charms").unwrap(), 1);
}

#[test]
fn states_over_separate_stores_do_not_interfere() {
    let (a, _) = new_state();
    let (b, _) = new_state();
    deploy(&a, "wordpress", false).add_unit().unwrap();
    let wordpress = deploy(&b, "wordpress", false);
    assert_eq!(wordpress.add_unit().unwrap().name(), "wordpress/0");
}
