//! `tofui publish` specs, against a local directory store.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn first_publish_fills_slot_one() {
    let dashboard = Dashboard::empty();

    dashboard
        .publish("acme/infra", "nightly-1")
        .args(&["--status", "build:0", "--html-url", "https://ci.example.com/1"])
        .passes()
        .stdout_has("Published nightly-1 to slot 1 of acme/infra/_root/build")
        .stdout_has("reports/acme-infra-_root-build-001.json")
        .stdout_has("build: 0");

    assert_eq!(dashboard.reports(), vec!["acme-infra-_root-build-001.json"]);
    let report = dashboard.read_json("reports/acme-infra-_root-build-001.json");
    assert_eq!(report["source_repo"], "acme/infra");
    assert_eq!(report["folder"], "_root");
    assert_eq!(report["report_type"], "build");
    assert_eq!(report["build_name"], "nightly-1");
    assert_eq!(report["display_name"], "nightly-1");
    assert_eq!(report["html_url"], "https://ci.example.com/1");
    assert_eq!(report["statuses"]["build"], 0);
    assert_eq!(report["slot_number"], 1);
    assert!(report["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn eighth_publish_evicts_the_first() {
    let dashboard = Dashboard::empty();
    for name in ["A", "B", "C", "D", "E", "F", "G"] {
        dashboard.publish("acme/infra", name).passes();
    }
    assert_eq!(dashboard.reports().len(), 7);

    dashboard
        .publish("acme/infra", "H")
        .passes()
        .stdout_has("to slot 1 of")
        .stdout_has("replaced:  A from");

    let names: Vec<_> = dashboard
        .reports()
        .iter()
        .map(|f| dashboard.read_json(&format!("reports/{f}"))["build_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["H", "B", "C", "D", "E", "F", "G"]);
}

#[test]
fn folders_and_modes_rotate_separately() {
    let dashboard = Dashboard::empty();
    dashboard.publish("acme/infra", "b1").passes();
    dashboard.publish("acme/infra", "t1").args(&["--mode", "test"]).passes();
    dashboard.publish("acme/infra", "n1").args(&["--folder", "nightly"]).passes();

    assert_eq!(
        dashboard.reports(),
        vec![
            "acme-infra-_root-build-001.json",
            "acme-infra-_root-test-001.json",
            "acme-infra-nightly-build-001.json",
        ]
    );
}

#[test]
fn json_output_describes_the_outcome() {
    let dashboard = Dashboard::empty();
    let out = dashboard
        .publish("acme/infra", "nightly")
        .args(&["--display-name", "Nightly", "--output", "json"])
        .passes();
    let json = out.json();
    assert_eq!(json["slot"], 1);
    assert_eq!(json["attempts"], 1);
    assert_eq!(json["path"], "reports/acme-infra-_root-build-001.json");
    assert_eq!(json["report"]["display_name"], "Nightly");
    assert!(json["replaced"].is_null());
}

#[test]
fn catalog_labels_statuses() {
    let dashboard = Dashboard::empty();
    let config = dashboard.write(
        "config.json",
        r#"{"status_types": {"build": {"name": "Build", "mappings": {"0": {"label": "Success", "emoji": "✅"}}}},
            "repositories": {"acme/infra": {"display_name": "Infra", "folders": ["nightly"]}}}"#,
    );

    dashboard
        .publish("acme/infra", "n1")
        .args(&["--folder", "nightly", "--status", "build:0", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("Build: ✅ Success (0)");
}

#[test]
fn unregistered_target_is_invalid_input() {
    let dashboard = Dashboard::empty();
    let config = dashboard.write(
        "config.json",
        r#"{"repositories": {"acme/infra": {"display_name": "Infra", "folders": ["nightly"]}}}"#,
    );
    let config = config.to_str().unwrap();

    dashboard
        .publish("acme/other", "x")
        .args(&["--config", config])
        .fails_with(2)
        .stderr_has("acme/other");
    dashboard
        .publish("acme/infra", "x")
        .args(&["--folder", "weekly", "--config", config])
        .fails_with(2)
        .stderr_has("weekly");
    assert!(dashboard.reports().is_empty());
}

#[test]
fn malformed_repository_is_invalid_input() {
    let dashboard = Dashboard::empty();
    dashboard.publish("not-a-repo", "x").fails_with(2).stderr_has("not-a-repo");
    dashboard.publish("acme/infra", "x").args(&["--folder", "a/b"]).fails_with(2);
    assert!(dashboard.reports().is_empty());
}

#[test]
fn status_syntax_errors_are_invalid_input() {
    let dashboard = Dashboard::empty();
    dashboard.publish("acme/infra", "x").args(&["--status", "build:ok"]).fails_with(2);
    dashboard
        .publish("acme/infra", "x")
        .args(&["--status", "build:0", "--status", "build:1"])
        .fails_with(2)
        .stderr_has("more than once");
    assert!(dashboard.reports().is_empty());
}

#[test]
fn unknown_mode_is_invalid_input() {
    Dashboard::empty().publish("acme/infra", "x").args(&["--mode", "deploy"]).fails_with(2);
}

#[test]
fn github_needs_a_token() {
    cli()
        .args(&["publish", "--repo", "acme/infra", "--build-name", "x", "--dashboard", "acme/dash"])
        .fails_with(2)
        .stderr_has("GITHUB_TOKEN");
}

#[test]
fn unreachable_github_exhausts_retries() {
    cli()
        .args(&[
            "publish",
            "--repo",
            "acme/infra",
            "--build-name",
            "x",
            "--dashboard",
            "acme/dash",
            "--enterprise-url",
            "http://127.0.0.1:9",
        ])
        .env("GITHUB_TOKEN", "ghp_test")
        .env("TOFUI_REMOTE_TIMEOUT_MS", "2000")
        .fails_with(1)
        .stderr_has("gave up after 12 attempts");
}

#[test]
fn corrupt_slot_is_replaced() {
    let dashboard = Dashboard::empty();
    dashboard.write("reports/acme-infra-_root-build-001.json", "{ truncated");

    dashboard
        .publish("acme/infra", "fresh")
        .passes()
        .stdout_has("to slot 1 of")
        .stdout_lacks("replaced:");

    let report = dashboard.read_json("reports/acme-infra-_root-build-001.json");
    assert_eq!(report["build_name"], "fresh");
}
