use super::*;
use std::fs;
use tempfile::TempDir;

fn aliases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_merge_preserves_existing_entries_and_sections() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(
        &path,
        r#"{
  "name": "client",
  "scripts": { "build": "snowpack build" },
  "snowpack": { "install": ["htm"], "buildOptions": { "out": "build" } }
}"#,
    )
    .unwrap();

    let added = merge_install_list(
        &path,
        &InstallListLocation::default(),
        &aliases(&["htm", "a_left_pad"]),
    )
    .unwrap();
    assert_eq!(added, 1);

    let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(merged["name"], "client");
    assert_eq!(merged["scripts"]["build"], "snowpack build");
    assert_eq!(merged["snowpack"]["buildOptions"]["out"], "build");
    assert_eq!(
        merged["snowpack"]["install"],
        serde_json::json!(["htm", "a_left_pad"])
    );

    let keys: Vec<_> = merged.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["name", "scripts", "snowpack"]);
}

#[test]
fn test_merge_creates_missing_section() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(&path, r#"{"name": "client"}"#).unwrap();

    merge_install_list(&path, &InstallListLocation::default(), &aliases(&["x"])).unwrap();

    let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(merged["snowpack"]["install"], serde_json::json!(["x"]));
}

#[test]
fn test_merge_creates_missing_manifest() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");

    merge_install_list(&path, &InstallListLocation::default(), &aliases(&["x"])).unwrap();

    let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(merged, serde_json::json!({"snowpack": {"install": ["x"]}}));
}

#[test]
fn test_custom_location() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(&path, "{}").unwrap();
    let location = InstallListLocation {
        section: "bundler".to_string(),
        key: "modules".to_string(),
    };

    merge_install_list(&path, &location, &aliases(&["x"])).unwrap();

    let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(merged["bundler"]["modules"], serde_json::json!(["x"]));
}

#[test]
fn test_wrong_shape_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(&path, r#"{"snowpack": {"install": "htm"}}"#).unwrap();

    let err = merge_install_list(&path, &InstallListLocation::default(), &aliases(&["x"]))
        .unwrap_err();
    assert!(matches!(err, ManifestError::Shape { .. }));
}

#[test]
fn test_invalid_json_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(&path, "{").unwrap();

    let err = merge_install_list(&path, &InstallListLocation::default(), &aliases(&["x"]))
        .unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
}
