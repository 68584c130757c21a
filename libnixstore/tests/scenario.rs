// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! End-to-end use of the process-wide store.
//!
//! Everything lives in one test because the settings installed by
//! `initialize_with` are process-wide.

use libnixstore::{Error, ErrorTag, Store};
use nixstore_engine::test::TestStore;

#[test]
fn initialize_open_and_query() {
    let mut test_store = TestStore::new().unwrap();
    let hello = test_store
        .add_derivation("hello", &[("src", "/nix/store/aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa-hello.tar.gz")])
        .unwrap();

    let installed = libnixstore::initialize_with(test_store.settings());
    assert_eq!(installed, &test_store.settings());
    // A second initialization keeps the settings already in place.
    assert_eq!(libnixstore::initialize().unwrap(), installed);

    let store = Store::new().unwrap();
    assert!(!store.version().unwrap().is_empty());

    let relative = hello.to_string();
    let drv = store.parse_store_path(&relative).unwrap();
    assert_eq!(drv.relative_path(), relative);
    assert_eq!(store.derivation_name(&drv).unwrap(), "hello");
    assert_eq!(
        store.derivation_env_val(&drv, "src").unwrap(),
        "/nix/store/aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa-hello.tar.gz"
    );

    let again = store.parse_store_path(&relative).unwrap();
    assert_eq!(drv.info(), again.info());

    let err = store.parse_store_path("not a path").unwrap_err();
    assert_eq!(err.tag(), Some(ErrorTag::StorePath));

    let err = store.derivation_env_val(&drv, "PATH").unwrap_err();
    assert!(matches!(&err, Error::EnvKeyDoesNotExist(msg) if msg.contains("PATH")));
    assert!(err.to_wire().starts_with("2,"));

    // A second handle sees the same store.
    let other = Store::new().unwrap();
    assert_eq!(other.parse_store_path(&relative).unwrap(), drv);
}
