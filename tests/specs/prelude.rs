// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub use similar_asserts::assert_eq;

/// `tofui` with a clean environment: no token, no color, fast retries.
pub fn cli() -> CliBuilder {
    let mut cmd = Command::cargo_bin("tofui").expect("tofui binary is built");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("TOFUI_RETRY_BASE_MS", "1")
        .env("TOFUI_RETRY_MAX_MS", "2")
        .env("TOFUI_RETRY_JITTER", "0");
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(self) -> Output {
        self.run(0)
    }

    pub fn fails_with(self, code: i32) -> Output {
        self.run(code)
    }

    fn run(mut self, code: i32) -> Output {
        let output = self.cmd.output().expect("tofui runs");
        let out = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        };
        if out.code != Some(code) {
            panic!(
                "expected exit {}, got {:?}\n--- stdout\n{}\n--- stderr\n{}",
                code, out.code, out.stdout, out.stderr
            );
        }
        out
    }
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout is JSON")
    }
}

/// A local dashboard directory used as the store.
pub struct Dashboard {
    dir: tempfile::TempDir,
}

impl Dashboard {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let content = std::fs::read_to_string(self.file(relative)).expect("read file");
        serde_json::from_str(&content).expect("file is JSON")
    }

    /// Slot files under `reports/`, sorted.
    pub fn reports(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(self.file("reports"))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter_map(|e| e.file_name().to_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// `tofui publish` against this dashboard.
    pub fn publish(&self, repo: &str, build_name: &str) -> CliBuilder {
        cli().args(&[
            "publish",
            "--repo",
            repo,
            "--build-name",
            build_name,
            "--store-dir",
            self.path().to_str().expect("utf-8 temp path"),
        ])
    }

    /// `tofui slots` against this dashboard.
    pub fn slots(&self, repo: &str) -> CliBuilder {
        cli().args(&["slots", "--repo", repo, "--store-dir", self.path().to_str().expect("utf-8 temp path")])
    }
}
