// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use nixstore_engine::test::TestStore;
use predicates::prelude::*;

struct Fixture {
    store: TestStore,
    drv: String,
    plain: String,
}

impl Fixture {
    fn new() -> Self {
        let mut store = TestStore::new().unwrap();
        let plain = store.add_path("hello-2.12.1").unwrap();
        let drv = store
            .add_derivation("hello", &[("pname", "hello"), ("version", "2.12.1")])
            .unwrap();
        Self {
            store,
            drv: drv.to_string(),
            plain: plain.to_string(),
        }
    }

    fn query(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("nixstore-query");
        cmd.env_remove("NIXSTORE_CONFIG")
            .env_remove("NIX_REMOTE")
            .env_remove("NIX_STORE_DIR")
            .env_remove("NIX_STATE_DIR")
            .arg("--store")
            .arg(self.store.settings().store);
        cmd
    }
}

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("nixstore-query")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("drv-name").and(predicate::str::contains("env")));
}

#[test]
fn version() {
    let fixture = Fixture::new();
    fixture
        .query()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn path_absolute_and_relative() {
    let fixture = Fixture::new();
    let expected = format!("{}\n", fixture.drv);
    fixture
        .query()
        .arg("path")
        .arg(format!("/nix/store/{}", fixture.drv))
        .assert()
        .success()
        .stdout(expected.clone());
    fixture
        .query()
        .args(["path", fixture.drv.as_str()])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn drv_name_and_env() {
    let fixture = Fixture::new();
    fixture
        .query()
        .args(["drv-name", fixture.drv.as_str()])
        .assert()
        .success()
        .stdout("hello\n");
    fixture
        .query()
        .args(["env", fixture.drv.as_str(), "version"])
        .assert()
        .success()
        .stdout("2.12.1\n");
}

#[test]
fn missing_env_key() {
    let fixture = Fixture::new();
    fixture
        .query()
        .args(["--wire-errors", "env", fixture.drv.as_str(), "PATH"])
        .assert()
        .failure()
        .code(1)
        .stderr("2,derivation environment value for key 'PATH' doesn't exist\n");
    fixture
        .query()
        .args(["env", fixture.drv.as_str(), "PATH"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: while reading derivation: "));
}

#[test]
fn invalid_paths() {
    let fixture = Fixture::new();
    fixture
        .query()
        .args(["--wire-errors", "path", "not a path"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("1,'not a path' is too short"));
    fixture
        .query()
        .args([
            "--wire-errors",
            "path",
            "/nix/store/2qwfcpv54pb5l7nbyzg16rbd0xxc253d-gone",
        ])
        .assert()
        .failure()
        .stderr("1,path '/nix/store/2qwfcpv54pb5l7nbyzg16rbd0xxc253d-gone' is not valid\n");
    fixture
        .query()
        .args(["drv-name", fixture.plain.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a derivation"));
}

#[test]
fn info_json() {
    let fixture = Fixture::new();
    let assert = fixture
        .query()
        .args(["info", fixture.plain.as_str()])
        .assert()
        .success();
    let info: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(info["path"], fixture.plain.as_str());
    assert_eq!(info["narSize"], 120);
    assert_eq!(info["ultimate"], true);
    assert_eq!(info["references"], serde_json::json!([]));
}

#[test]
fn unsupported_store() {
    cargo_bin_cmd!("nixstore-query")
        .env_remove("NIXSTORE_CONFIG")
        .args(["--store", "daemon", "--wire-errors", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "don't know how to open Nix store with URI 'daemon'",
        ));
}
