use super::*;
use std::fs;
use tempfile::TempDir;

struct FailingContributor;

impl Contributor for FailingContributor {
    fn name(&self) -> &str {
        "broken"
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        anyhow::bail!("declaration unavailable")
    }
}

struct PanickingContributor;

impl Contributor for PanickingContributor {
    fn name(&self) -> &str {
        "explosive"
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        panic!("kaboom")
    }
}

#[test]
fn test_static_contributors_in_order() {
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("A").with_package("left-pad"))
        .with(StaticContributor::new("B").with_package("left-pad"));

    let discovery = registry.discover();

    assert!(discovery.errors.is_empty());
    let pairs: Vec<_> = discovery
        .entries
        .iter()
        .map(|e| (e.contributor.as_str(), e.package_name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "left-pad"), ("B", "left-pad")]);
}

#[test]
fn test_failure_is_isolated() {
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("A").with_package("left-pad"))
        .with(FailingContributor)
        .with(StaticContributor::new("C").with_package("react"));

    let discovery = registry.discover();

    assert_eq!(discovery.entries.len(), 2);
    assert_eq!(discovery.errors.len(), 1);
    assert_eq!(discovery.errors[0].contributor, "broken");
    assert!(discovery.errors[0].cause.contains("declaration unavailable"));
    assert_eq!(
        discovery.errors[0].to_string(),
        "broken failed because declaration unavailable"
    );
}

#[test]
fn test_panic_is_isolated() {
    let registry = ContributorRegistry::new()
        .with(PanickingContributor)
        .with(StaticContributor::new("A").with_package("left-pad"));

    let discovery = registry.discover();

    assert_eq!(discovery.entries.len(), 1);
    assert_eq!(discovery.errors.len(), 1);
    assert_eq!(discovery.errors[0].contributor, "explosive");
    assert!(discovery.errors[0].cause.contains("kaboom"));
}

#[test]
fn test_entries_are_retagged() {
    let registry = ContributorRegistry::new().with(
        StaticContributor::new("honest").with_entry(DependencyEntry::new("impostor", "react")),
    );

    let discovery = registry.discover();
    assert_eq!(discovery.entries[0].contributor, "honest");
}

#[test]
fn test_from_directory_missing_is_empty() {
    let temp = TempDir::new().unwrap();
    let registry = ContributorRegistry::from_directory(&temp.path().join("nope")).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_from_directory_reads_sorted_toml() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("zeta.toml"),
        "[[dependency]]\npackage = \"react\"\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("alpha.toml"),
        r#"name = "widgets"

[[dependency]]
package = "left-pad@^1.3.0"
extra_exports = ["leftPad"]

[[dependency]]
package = "@scope/pkg"
alias = "scoped"
"#,
    )
    .unwrap();
    fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    let registry = ContributorRegistry::from_directory(temp.path()).unwrap();
    assert_eq!(registry.names(), vec!["widgets", "zeta"]);

    let discovery = registry.discover();
    assert!(discovery.errors.is_empty());
    assert_eq!(discovery.entries.len(), 3);
    assert_eq!(discovery.entries[0].package_name, "left-pad@^1.3.0");
    assert_eq!(discovery.entries[0].extra_exports, vec!["leftPad"]);
    assert_eq!(discovery.entries[1].alias.as_deref(), Some("scoped"));
    assert_eq!(discovery.entries[2].contributor, "zeta");
}

#[test]
fn test_invalid_declaration_reports_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.toml"), "[[dependency]]\npkg = 1\n").unwrap();
    fs::write(
        temp.path().join("good.toml"),
        "[[dependency]]\npackage = \"react\"\n",
    )
    .unwrap();

    let registry = ContributorRegistry::from_directory(temp.path()).unwrap();
    let discovery = registry.discover();

    assert_eq!(discovery.entries.len(), 1);
    assert_eq!(discovery.errors.len(), 1);
    assert_eq!(discovery.errors[0].contributor, "bad");
    assert!(discovery.errors[0].cause.contains("bad.toml"));
}

#[test]
fn test_invalid_entries_are_isolated() {
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("good").with_package("react"))
        .with(
            StaticContributor::new("zz_bad")
                .with_package("htm")
                .with_package(""),
        )
        .with(
            StaticContributor::new("shady")
                .with_entry(DependencyEntry::new("shady", "preact").with_alias("../preact")),
        );

    let discovery = registry.discover();

    assert_eq!(discovery.entries, vec![DependencyEntry::new("good", "react")]);
    let failed: Vec<_> = discovery
        .errors
        .iter()
        .map(|e| e.contributor.as_str())
        .collect();
    assert_eq!(failed, vec!["zz_bad", "shady"]);
    assert!(discovery.errors[0].cause.contains("empty package name"));
}

#[test]
fn test_empty_package_in_declaration_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("good.toml"), "[[dependency]]\npackage = \"react\"\n").unwrap();
    fs::write(temp.path().join("zz_bad.toml"), "[[dependency]]\npackage = \"\"\n").unwrap();

    let discovery = ContributorRegistry::from_directory(temp.path())
        .unwrap()
        .discover();

    assert_eq!(discovery.entries.len(), 1);
    assert_eq!(discovery.entries[0].contributor, "good");
    assert_eq!(discovery.errors.len(), 1);
    assert_eq!(discovery.errors[0].contributor, "zz_bad");
}
