//! `tofui slots` specs

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn empty_rotation() {
    Dashboard::empty()
        .slots("acme/infra")
        .passes()
        .stdout_has("acme/infra/_root/build (0 of 7 occupied)");
}

#[test]
fn shows_published_reports() {
    let dashboard = Dashboard::empty();
    dashboard.publish("acme/infra", "first").args(&["--status", "build:0"]).passes();
    dashboard.publish("acme/infra", "second").passes();

    dashboard
        .slots("acme/infra")
        .passes()
        .stdout_has("(2 of 7 occupied)")
        .stdout_has("first")
        .stdout_has("build=0")
        .stdout_has("2*");
}

#[test]
fn json_lists_every_slot() {
    let dashboard = Dashboard::empty();
    dashboard.publish("acme/infra", "first").passes();

    let out = dashboard.slots("acme/infra").args(&["--output", "json"]).passes();
    let json = out.json();
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 7);
    assert_eq!(slots[0]["state"], "occupied");
    assert_eq!(slots[0]["report"]["build_name"], "first");
    assert_eq!(slots[6]["state"], "empty");
}

#[test]
fn reading_does_not_write() {
    let dashboard = Dashboard::empty();
    dashboard.slots("acme/infra").passes();
    assert!(dashboard.reports().is_empty());
}
