use super::*;
use crate::client::store::{DependencyEntry, StoreError};
use std::fs;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    layout: ClientLayout,
    store: ConfigStore,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let layout = ClientLayout::for_workdir(temp.path());
    let store = ConfigStore::open(&layout.store_path).unwrap();
    store
        .transact(|tx| {
            tx.update(vec![
                DependencyEntry::new("A", "left-pad").with_extra_exports(["leftPad", "default"]),
                DependencyEntry::new("B", "react"),
            ]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    fs::create_dir_all(layout.web_modules_dir()).unwrap();
    fs::write(
        layout.module_file("a_left_pad"),
        "export default function leftPad() {}\nexport const VERSION = '1';\n",
    )
    .unwrap();

    Fixture {
        _temp: temp,
        layout,
        store,
    }
}

#[test]
fn test_module_exports_merges_extra_exports() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert_eq!(
        artifacts.module_exports("A", "left-pad"),
        vec!["default", "VERSION", "leftPad"]
    );
}

#[test]
fn test_module_exports_empty_when_unregistered() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert!(artifacts.module_exports("pkgA", "react").is_empty());
}

#[test]
fn test_module_exports_empty_when_not_built() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert!(artifacts.module_exports("B", "react").is_empty());
}

#[test]
fn test_module_url() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert_eq!(
        artifacts.module_url("A", "left-pad").as_deref(),
        Some("../web_modules/a_left_pad.js")
    );
    assert_eq!(artifacts.module_url("B", "react"), None);
    assert_eq!(artifacts.module_url("nobody", "left-pad"), None);
}

#[test]
fn test_module_url_uses_prefix() {
    let mut f = fixture();
    f.layout.url_prefix = "/static/".to_string();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert_eq!(
        artifacts.module_url("A", "left-pad").as_deref(),
        Some("/static/web_modules/a_left_pad.js")
    );
}

#[test]
fn test_resolve_path_rejects_absolute() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    let err = artifacts.resolve_path("/etc/passwd").unwrap_err();
    assert_eq!(err.path, "/etc/passwd");
}

#[test]
fn test_resolve_path_rejects_parent_traversal() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert!(artifacts.resolve_path("web_modules/../../secret").is_err());
}

#[test]
fn test_resolve_path_missing_is_none() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert_eq!(artifacts.resolve_path("missing/file.js").unwrap(), None);
}

#[test]
fn test_resolve_path_existing() {
    let f = fixture();
    let artifacts = BuildArtifacts::new(&f.store, &f.layout);

    assert_eq!(
        artifacts.resolve_path("web_modules/a_left_pad.js").unwrap(),
        Some(f.layout.module_file("a_left_pad"))
    );
    assert_eq!(artifacts.resolve_path("web_modules/x.js").unwrap(), None);
}
