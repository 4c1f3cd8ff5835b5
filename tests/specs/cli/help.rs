//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("publish").stdout_has("slots");
}

#[test]
fn no_args_shows_usage_and_exits_two() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn publish_help_shows_flags() {
    cli()
        .args(&["publish", "--help"])
        .passes()
        .stdout_has("--repo")
        .stdout_has("--status")
        .stdout_has("--build-name")
        .stdout_has("--store-dir")
        .stdout_has("gh-pages");
}

#[test]
fn slots_help_shows_usage() {
    cli().args(&["slots", "--help"]).passes().stdout_has("Usage:");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("tofui 0.2");
}
