use super::*;
use crate::client::artifacts::BuildArtifacts;
use crate::client::discovery::{Contributor, StaticContributor};
use crate::client::store::ConfigValidationError;
use crate::display::{DisplayCall, MockDisplayProvider};
use crate::testing::{ClientFixture, FakeTool};
use std::fs;

struct Broken;

impl Contributor for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        anyhow::bail!("manifest missing")
    }
}

fn two_contributors() -> ContributorRegistry {
    ContributorRegistry::new()
        .with(StaticContributor::new("A").with_package("left-pad"))
        .with(StaticContributor::new("B").with_package("left-pad@^1.3.0"))
}

#[test]
fn test_build_publishes_aliased_modules() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = two_contributors();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let orchestrator =
        BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display);
    let report = orchestrator.build(Vec::new()).unwrap();

    assert_eq!(report.aliases, vec!["a_left_pad", "b_left_pad"]);
    assert_eq!(
        report.installed,
        vec!["a_left_pad@npm:left-pad", "b_left_pad@npm:left-pad@^1.3.0"]
    );
    assert!(report.discovery_errors.is_empty());
    assert!(fixture.layout.module_file("a_left_pad").exists());
    assert!(fixture.layout.module_file("b_left_pad").exists());
    assert!(fixture.layout.module_file("htm").exists());

    let calls = tool.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].step, ToolStep::Install);
    assert_eq!(calls[0].packages, report.installed);
    assert_eq!(calls[1].step, ToolStep::Build);
    assert!(calls[0].cwd.ends_with("app"));
    assert!(!calls[0].cwd.starts_with(fixture.path()));

    assert!(display.has_call(&DisplayCall::ProgressSpinner {
        message: "Discovering dependencies".to_string()
    }));
    assert!(display.has_call(&DisplayCall::ProgressSpinner {
        message: "Installing 2 dependencies".to_string()
    }));
    assert!(display.has_call(&DisplayCall::ProgressSpinner {
        message: "Building client".to_string()
    }));
}

#[test]
fn test_template_manifest_is_not_modified() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = two_contributors();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap();

    assert_eq!(
        fixture.read_file("app/package.json").unwrap(),
        crate::testing::filesystem::TEMPLATE_PACKAGE_JSON
    );
}

#[test]
fn test_build_is_idempotent() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = two_contributors();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();
    let orchestrator =
        BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display);

    let first = orchestrator.build(Vec::new()).unwrap();
    let second = orchestrator.build(Vec::new()).unwrap();

    assert_eq!(first.aliases, second.aliases);
    assert_eq!(first.output_digest, second.output_digest);
}

#[test]
fn test_extra_entries_are_registered() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let report = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(vec![DependencyEntry::new("app", "react@17")])
        .unwrap();

    assert_eq!(report.aliases, vec!["app_react"]);
    let artifacts = BuildArtifacts::new(&store, &fixture.layout);
    assert_eq!(
        artifacts.module_url("app", "react@17").as_deref(),
        Some("../web_modules/app_react.js")
    );
    assert_eq!(artifacts.module_exports("app", "react@17"), vec!["default", "name"]);
}

#[test]
fn test_failing_contributor_is_reported_not_fatal() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("A").with_package("left-pad"))
        .with(Broken);
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let report = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap();

    assert_eq!(report.aliases, vec!["a_left_pad"]);
    assert_eq!(report.discovery_errors.len(), 1);
    assert_eq!(report.discovery_errors[0].contributor, "broken");
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "broken failed because manifest missing".to_string(),
        details: String::new(),
    }));
}

#[test]
fn test_malformed_contributor_does_not_abort_build() {
    let fixture = ClientFixture::new().unwrap();
    fixture
        .write_contributor("good", "[[dependency]]\npackage = \"react\"\n")
        .unwrap();
    fixture
        .write_contributor("zz_bad", "[[dependency]]\npackage = \"\"\n")
        .unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::from_directory(&fixture.layout.contrib_dir).unwrap();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let report = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap();

    assert_eq!(report.aliases, vec!["good_react"]);
    assert_eq!(store.get_alias("good", "react"), Some("good_react".to_string()));
    assert_eq!(report.discovery_errors.len(), 1);
    assert_eq!(report.discovery_errors[0].contributor, "zz_bad");
    assert_eq!(tool.calls().len(), 2);
}

#[test]
fn test_invalid_extra_entry_aborts_build() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let err = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(vec![DependencyEntry::new("app", "")])
        .unwrap_err();

    assert!(matches!(
        err,
        BuildError::Store(StoreError::Validation(ConfigValidationError::EmptyPackage { .. }))
    ));
    assert!(tool.calls().is_empty());
    assert!(store.all_aliases().is_empty());
}

#[test]
fn test_failed_install_leaves_output_untouched() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = two_contributors();
    let display = MockDisplayProvider::new();

    let good = FakeTool::new();
    BuildOrchestrator::new(&store, &registry, &good, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap();
    let before = fsutil::tree_digest(&fixture.layout.build_dir).unwrap();
    let url_before = BuildArtifacts::new(&store, &fixture.layout).module_url("A", "left-pad");

    let bad = FakeTool::new().failing_install("npm ERR! 404 Not Found - left-pad");
    let err = BuildOrchestrator::new(&store, &registry, &bad, &fixture.layout, &display)
        .build(vec![DependencyEntry::new("app", "does-not-exist")])
        .unwrap_err();

    match &err {
        BuildError::ExternalTool {
            step,
            status,
            stderr,
            command,
        } => {
            assert_eq!(*step, ToolStep::Install);
            assert_eq!(*status, Some(1));
            assert_eq!(stderr, "npm ERR! 404 Not Found - left-pad");
            assert!(command.starts_with("fake-npm install"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("npm ERR! 404 Not Found"));
    assert_eq!(bad.calls().len(), 1);
    assert_eq!(fsutil::tree_digest(&fixture.layout.build_dir).unwrap(), before);
    assert_eq!(
        BuildArtifacts::new(&store, &fixture.layout).module_url("A", "left-pad"),
        url_before
    );
    assert!(display.has_call(&DisplayCall::ProgressAbandon {
        message: "Installing 3 dependencies failed".to_string()
    }));
}

#[test]
fn test_failed_build_names_step() {
    let fixture = ClientFixture::new().unwrap();
    fixture.write_live_module("htm", "export default 1;").unwrap();
    let store = fixture.open_store().unwrap();
    let registry = two_contributors();
    let tool = FakeTool::new().failing_build("SyntaxError: Unexpected token");
    let display = MockDisplayProvider::new();

    let err = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap_err();

    assert!(matches!(
        err,
        BuildError::ExternalTool {
            step: ToolStep::Build,
            ..
        }
    ));
    assert_eq!(
        fs::read_to_string(fixture.layout.module_file("htm")).unwrap(),
        "export default 1;"
    );
    assert!(!fixture.layout.module_file("a_left_pad").exists());
}

#[test]
fn test_missing_output_is_an_error() {
    let fixture = ClientFixture::new().unwrap();
    fixture.write_live_module("htm", "export default 1;").unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new().without_output();
    let display = MockDisplayProvider::new();

    let err = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap_err();

    assert!(matches!(err, BuildError::MissingOutput { .. }));
    assert!(fixture.layout.module_file("htm").exists());
}

#[test]
fn test_missing_template_is_an_error() {
    let fixture = ClientFixture::new().unwrap();
    fs::remove_dir_all(&fixture.layout.app_dir).unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    let err = BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap_err();

    assert!(matches!(err, BuildError::MissingTemplate { .. }));
    assert!(tool.calls().is_empty());
}

#[test]
fn test_stale_modules_are_replaced_wholesale() {
    let fixture = ClientFixture::new().unwrap();
    fixture.write_live_module("stale_module", "export default 0;").unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .build(Vec::new())
        .unwrap();

    assert!(!fixture.layout.module_file("stale_module").exists());
    assert!(fixture.layout.module_file("htm").exists());
}

#[test]
fn test_restore_forgets_custom_aliases() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();
    let orchestrator =
        BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display);

    orchestrator
        .build(vec![DependencyEntry::new("custom", "left-pad")])
        .unwrap();
    assert!(BuildArtifacts::new(&store, &fixture.layout)
        .module_url("custom", "left-pad")
        .is_some());

    let report = orchestrator.restore().unwrap();

    assert!(report.aliases.is_empty());
    assert!(store.all_aliases().is_empty());
    assert!(BuildArtifacts::new(&store, &fixture.layout)
        .module_url("custom", "left-pad")
        .is_none());
    assert!(!fixture.layout.module_file("custom_left_pad").exists());
    assert!(fixture.layout.module_file("htm").exists());

    let calls = tool.calls();
    let restore_install = &calls[calls.len() - 2];
    assert_eq!(restore_install.step, ToolStep::Install);
    assert!(restore_install.packages.is_empty());
}

#[test]
fn test_failed_restore_keeps_store_and_output() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new();
    let display = MockDisplayProvider::new();

    let good = FakeTool::new();
    BuildOrchestrator::new(&store, &registry, &good, &fixture.layout, &display)
        .build(vec![DependencyEntry::new("custom", "left-pad")])
        .unwrap();

    let bad = FakeTool::new().failing_build("boom");
    let err = BuildOrchestrator::new(&store, &registry, &bad, &fixture.layout, &display)
        .restore()
        .unwrap_err();

    assert!(matches!(err, BuildError::ExternalTool { .. }));
    assert_eq!(store.all_aliases(), vec!["custom_left_pad"]);
    assert!(fixture.layout.module_file("custom_left_pad").exists());
}

#[test]
fn test_custom_install_list_location() {
    let fixture = ClientFixture::new().unwrap();
    let store = fixture.open_store().unwrap();
    let registry = ContributorRegistry::new().with(StaticContributor::new("A").with_package("x"));
    let tool = FakeTool::new();
    let display = MockDisplayProvider::new();

    BuildOrchestrator::new(&store, &registry, &tool, &fixture.layout, &display)
        .with_install_list(InstallListLocation {
            section: "bundler".to_string(),
            key: "modules".to_string(),
        })
        .build(Vec::new())
        .unwrap();

    // The fake bundler only reads snowpack.install, so the alias is not emitted
    assert!(!fixture.layout.module_file("a_x").exists());
    assert!(fixture.layout.module_file("htm").exists());
}
