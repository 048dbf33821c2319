use super::*;
use std::fs;
use tempfile::TempDir;

fn open_temp() -> (TempDir, ConfigStore) {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::open(temp.path().join(".clientpack/build-config.json")).unwrap();
    (temp, store)
}

#[test]
fn test_missing_file_opens_empty() {
    let (_temp, store) = open_temp();
    assert!(store.all_aliases().is_empty());
    assert!(store.entries().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_two_contributors_same_package() {
    let (_temp, store) = open_temp();

    let mut tx = store.begin_transaction().unwrap();
    tx.update(vec![
        DependencyEntry::new("A", "left-pad"),
        DependencyEntry::new("B", "left-pad"),
    ]);
    tx.commit().unwrap();

    assert_eq!(store.all_aliases(), vec!["a_left_pad", "b_left_pad"]);
    assert_eq!(
        store.all_aliased_dependencies(),
        vec!["a_left_pad@npm:left-pad", "b_left_pad@npm:left-pad"]
    );
}

#[test]
fn test_colliding_slugs_get_suffixes() {
    let (_temp, store) = open_temp();

    store
        .transact(|tx| {
            tx.update(vec![
                DependencyEntry::new("a.b", "c"),
                DependencyEntry::new("a", "b-c"),
                DependencyEntry::new("a-b", "c"),
            ]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    assert_eq!(store.all_aliases(), vec!["a_b_c", "a_b_c_2", "a_b_c_3"]);
}

#[test]
fn test_reregistering_keeps_alias_and_replaces_exports() {
    let (_temp, store) = open_temp();

    store
        .transact(|tx| {
            tx.update(vec![
                DependencyEntry::new("widgets", "left-pad@^1.3.0").with_extra_exports(["leftPad"]),
            ]);
            Ok::<_, StoreError>(())
        })
        .unwrap();
    store
        .transact(|tx| {
            tx.update(vec![
                DependencyEntry::new("widgets", "left-pad@^1.3.0")
                    .with_alias("ignored_now")
                    .with_extra_exports(["pad", "pad"]),
            ]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    let entry = store.get_entry("widgets", "left-pad@^1.3.0").unwrap();
    assert_eq!(entry.alias.as_deref(), Some("widgets_left_pad"));
    assert_eq!(entry.extra_exports, vec!["pad"]);
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn test_preferred_alias_is_honored() {
    let (_temp, store) = open_temp();
    store
        .transact(|tx| {
            tx.update(vec![DependencyEntry::new("app", "react").with_alias("react")]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    assert_eq!(store.get_alias("app", "react").as_deref(), Some("react"));
}

#[test]
fn test_commit_persists_schema() {
    let (_temp, store) = open_temp();
    store
        .transact(|tx| {
            tx.update(vec![DependencyEntry::new("A", "left-pad")]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["dependencies"]["A"]["left-pad"]["alias"], "a_left_pad");
    assert_eq!(
        raw["dependencies"]["A"]["left-pad"]["extra_exports"],
        serde_json::json!([])
    );

    let reopened = ConfigStore::open(store.path()).unwrap();
    assert_eq!(reopened.all_aliases(), vec!["a_left_pad"]);
}

#[test]
fn test_rollback_discards_working_copy() {
    let (_temp, store) = open_temp();

    let mut tx = store.begin_transaction().unwrap();
    tx.update(vec![DependencyEntry::new("A", "left-pad")]);
    assert_eq!(tx.get_alias("A", "left-pad").as_deref(), Some("a_left_pad"));
    assert!(store.get_alias("A", "left-pad").is_none());
    tx.rollback();

    assert!(store.get_alias("A", "left-pad").is_none());
    assert!(!store.is_transaction_open());
}

#[test]
fn test_drop_rolls_back() {
    let (_temp, store) = open_temp();
    {
        let mut tx = store.begin_transaction().unwrap();
        tx.update(vec![DependencyEntry::new("A", "left-pad")]);
        assert_eq!(tx.state(), TransactionState::Open);
    }

    assert!(store.all_aliases().is_empty());
    assert!(store.begin_transaction().is_ok());
}

#[test]
fn test_second_begin_fails_fast() {
    let (_temp, store) = open_temp();
    let _tx = store.begin_transaction().unwrap();

    assert!(matches!(
        store.begin_transaction(),
        Err(StoreError::TransactionInProgress)
    ));
}

#[test]
fn test_transact_rolls_back_on_error() {
    let (_temp, store) = open_temp();

    let result: Result<(), StoreError> = store.transact(|tx| {
        tx.update(vec![DependencyEntry::new("A", "left-pad")]);
        Err(StoreError::TransactionInProgress)
    });

    assert!(result.is_err());
    assert!(store.all_aliases().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_invalid_alias_aborts_commit() {
    let (_temp, store) = open_temp();
    store
        .transact(|tx| {
            tx.update(vec![DependencyEntry::new("A", "left-pad")]);
            Ok::<_, StoreError>(())
        })
        .unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let mut tx = store.begin_transaction().unwrap();
    tx.update(vec![DependencyEntry::new("B", "evil").with_alias("../evil")]);
    let err = tx.commit().unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ConfigValidationError::InvalidAlias { .. })
    ));
    assert_eq!(store.all_aliases(), vec!["a_left_pad"]);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    assert!(!store.is_transaction_open());
}

#[test]
fn test_empty_names_fail_validation() {
    let (_temp, store) = open_temp();

    let mut tx = store.begin_transaction().unwrap();
    tx.update(vec![DependencyEntry::new("", "left-pad")]);
    assert!(matches!(
        tx.commit(),
        Err(StoreError::Validation(
            ConfigValidationError::EmptyContributor { .. }
        ))
    ));

    let mut tx = store.begin_transaction().unwrap();
    tx.update(vec![DependencyEntry::new("A", " ")]);
    assert!(matches!(
        tx.commit(),
        Err(StoreError::Validation(ConfigValidationError::EmptyPackage { .. }))
    ));
}

#[test]
fn test_validate_detects_duplicates_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("build-config.json");
    fs::write(
        &path,
        r#"{"version":1,"dependencies":{"A":{"x":{"alias":"dup"}},"B":{"y":{"alias":"dup"}}}}"#,
    )
    .unwrap();

    let store = ConfigStore::open(&path).unwrap();
    assert!(matches!(
        store.snapshot().validate(),
        Err(ConfigValidationError::DuplicateAlias { .. })
    ));
}

#[test]
fn test_unknown_version_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("build-config.json");
    fs::write(&path, r#"{"version":7,"dependencies":{}}"#).unwrap();

    assert!(matches!(
        ConfigStore::open(&path),
        Err(StoreError::UnsupportedVersion { .. })
    ));
}

#[test]
fn test_garbage_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("build-config.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(
        ConfigStore::open(&path),
        Err(StoreError::Json { .. })
    ));
}

#[test]
fn test_clear_empties_store() {
    let (_temp, store) = open_temp();
    store
        .transact(|tx| {
            tx.update(vec![DependencyEntry::new("A", "left-pad")]);
            Ok::<_, StoreError>(())
        })
        .unwrap();
    store
        .transact(|tx| {
            tx.clear();
            Ok::<_, StoreError>(())
        })
        .unwrap();

    assert!(store.all_aliases().is_empty());
    assert!(ConfigStore::open(store.path()).unwrap().entries().is_empty());
}

#[test]
fn test_aliases_are_npm_safe_and_case_insensitive() {
    let (_temp, store) = open_temp();

    store
        .transact(|tx| {
            tx.update(vec![
                DependencyEntry::new("日本", "left-pad"),
                DependencyEntry::new("B", "react").with_alias("ReactAlias"),
                DependencyEntry::new("C", "react").with_alias("reactalias"),
            ]);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    assert_eq!(
        store.all_aliased_dependencies(),
        vec![
            "contrib_left_pad@npm:left-pad",
            "reactalias@npm:react",
            "reactalias_2@npm:react",
        ]
    );
}

#[test]
fn test_validation_rejects_duplicate_and_uppercase_aliases() {
    let mut config: BuildConfig = serde_json::from_str(
        r#"{"B": {"react": {"alias": "reactalias"}}, "C": {"preact": {"alias": "reactalias"}}}"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigValidationError::DuplicateAlias { .. })
    ));

    config = serde_json::from_str(r#"{"B": {"react": {"alias": "ReactAlias"}}}"#).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigValidationError::InvalidAlias { .. })
    ));
}

#[test]
fn test_entry_validation() {
    assert!(DependencyEntry::new("app", "react").validate().is_ok());
    assert!(
        DependencyEntry::new("app", "react")
            .with_alias("ReactAlias")
            .validate()
            .is_ok()
    );
    assert_eq!(
        DependencyEntry::new("app", " ").validate(),
        Err(ConfigValidationError::EmptyPackage {
            contributor: "app".to_string()
        })
    );
    assert!(matches!(
        DependencyEntry::new("", "react").validate(),
        Err(ConfigValidationError::EmptyContributor { .. })
    ));
    assert!(matches!(
        DependencyEntry::new("app", "react").with_alias("_react").validate(),
        Err(ConfigValidationError::InvalidAlias { .. })
    ));
}
