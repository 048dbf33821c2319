use clientpack_lib::application::session::ProcessOutput;
use clientpack_lib::client::{
    BuildArtifacts, BuildOrchestrator, ClientLayout, ConfigStore, Contributor,
    ContributorRegistry, DependencyEntry, ExternalTool, InvalidPathError, StaticContributor,
};
use clientpack_lib::display::MockDisplayProvider;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Bundler stand-in: one module per alias named in `snowpack.install`
struct ScriptedTool {
    fail_install: Cell<bool>,
}

impl ScriptedTool {
    fn new() -> Self {
        Self {
            fail_install: Cell::new(false),
        }
    }
}

impl ExternalTool for ScriptedTool {
    fn program(&self) -> &str {
        "scripted"
    }

    fn install(&self, _packages: &[String], _cwd: &Path) -> anyhow::Result<ProcessOutput> {
        if self.fail_install.get() {
            return Ok(ProcessOutput::failure(1, "ERESOLVE unable to resolve"));
        }
        Ok(ProcessOutput::succeeded(""))
    }

    fn build(&self, cwd: &Path) -> anyhow::Result<ProcessOutput> {
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(cwd.join("package.json"))?)?;
        let out = cwd.join("build").join("web_modules");
        fs::create_dir_all(&out)?;
        for alias in manifest["snowpack"]["install"].as_array().into_iter().flatten() {
            let alias = alias.as_str().unwrap_or_default();
            fs::write(
                out.join(format!("{}.js", alias)),
                "export default function () {}\nexport const version = 1;\n",
            )?;
        }
        Ok(ProcessOutput::succeeded(""))
    }
}

struct FailingContributor;

impl Contributor for FailingContributor {
    fn name(&self) -> &str {
        "flaky"
    }

    fn dependencies(&self) -> anyhow::Result<Vec<DependencyEntry>> {
        anyhow::bail!("registry unreachable")
    }
}

fn workdir() -> (TempDir, ClientLayout) {
    let temp = tempfile::tempdir().unwrap();
    let layout = ClientLayout::for_workdir(temp.path());
    fs::create_dir_all(&layout.app_dir).unwrap();
    fs::write(
        layout.app_dir.join("package.json"),
        r#"{"name":"client","snowpack":{"install":[]}}"#,
    )
    .unwrap();
    (temp, layout)
}

#[test]
fn test_same_package_from_two_contributors() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("A").with_package("left-pad"))
        .with(StaticContributor::new("B").with_package("left-pad"));
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();

    BuildOrchestrator::new(&store, &registry, &tool, &layout, &display)
        .build(Vec::new())
        .unwrap();

    assert_eq!(store.all_aliases(), vec!["a_left_pad", "b_left_pad"]);
    let artifacts = BuildArtifacts::new(&store, &layout);
    assert_eq!(
        artifacts.module_url("B", "left-pad").as_deref(),
        Some("../web_modules/b_left_pad.js")
    );

    // Survives a reopen
    let reopened = ConfigStore::open(&layout.store_path).unwrap();
    assert_eq!(reopened.all_aliases(), store.all_aliases());
}

#[test]
fn test_failing_contributor_is_isolated() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry = ContributorRegistry::new()
        .with(StaticContributor::new("charts").with_package("d3"))
        .with(FailingContributor)
        .with(StaticContributor::new("forms").with_package("@formkit/core@1.0.0"));
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();

    let report = BuildOrchestrator::new(&store, &registry, &tool, &layout, &display)
        .build(Vec::new())
        .unwrap();

    assert_eq!(report.discovery_errors.len(), 1);
    assert_eq!(report.discovery_errors[0].contributor, "flaky");
    assert_eq!(store.all_aliases(), vec!["charts_d3", "forms_formkit_core"]);
}

#[test]
fn test_rebuild_is_idempotent() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry =
        ContributorRegistry::new().with(StaticContributor::new("app").with_package("htm"));
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();
    let orchestrator = BuildOrchestrator::new(&store, &registry, &tool, &layout, &display);

    let first = orchestrator.build(Vec::new()).unwrap();
    let second = orchestrator.build(Vec::new()).unwrap();

    assert_eq!(first.aliases, second.aliases);
    assert_eq!(first.output_digest, second.output_digest);
}

#[test]
fn test_failed_install_keeps_previous_bundle() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry = ContributorRegistry::new();
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();
    let orchestrator = BuildOrchestrator::new(&store, &registry, &tool, &layout, &display);
    orchestrator
        .build(vec![DependencyEntry::new("app", "htm")])
        .unwrap();
    let before = fs::read(layout.module_file("app_htm")).unwrap();

    tool.fail_install.set(true);
    let err = orchestrator
        .build(vec![DependencyEntry::new("app", "preact")])
        .unwrap_err();

    assert!(err.to_string().contains("ERESOLVE unable to resolve"));
    assert_eq!(fs::read(layout.module_file("app_htm")).unwrap(), before);
    let artifacts = BuildArtifacts::new(&store, &layout);
    assert!(artifacts.module_url("app", "htm").is_some());
    assert!(artifacts.module_url("app", "preact").is_none());
}

#[test]
fn test_restore_forgets_custom_modules() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry = ContributorRegistry::new();
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();
    let orchestrator = BuildOrchestrator::new(&store, &registry, &tool, &layout, &display);
    orchestrator
        .build(vec![DependencyEntry::new("custom", "left-pad")])
        .unwrap();

    orchestrator.restore().unwrap();

    let artifacts = BuildArtifacts::new(&store, &layout);
    assert_eq!(artifacts.module_url("custom", "left-pad"), None);
    assert!(store.all_aliases().is_empty());
}

#[test]
fn test_path_safety() {
    let (_temp, layout) = workdir();
    let store = ConfigStore::open(&layout.store_path).unwrap();
    let registry = ContributorRegistry::new();
    let tool = ScriptedTool::new();
    let display = MockDisplayProvider::new();
    BuildOrchestrator::new(&store, &registry, &tool, &layout, &display)
        .build(vec![DependencyEntry::new("app", "htm")])
        .unwrap();
    let artifacts = BuildArtifacts::new(&store, &layout);

    assert_eq!(
        artifacts.resolve_path("/etc/passwd"),
        Err(InvalidPathError {
            path: "/etc/passwd".to_string()
        })
    );
    assert_eq!(artifacts.resolve_path("missing/file.js"), Ok(None));
    assert_eq!(
        artifacts.resolve_path("web_modules/app_htm.js"),
        Ok(Some(layout.module_file("app_htm")))
    );
    assert!(artifacts.module_exports("pkgA", "react").is_empty());
    assert_eq!(
        artifacts.module_exports("app", "htm"),
        vec!["default", "version"]
    );
}
