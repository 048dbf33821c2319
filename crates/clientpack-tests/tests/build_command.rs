//! E2E tests for the build command
//!
//! Real temporary trees and a mock `npm` on a private PATH exercise staging,
//! process execution and publication together.

use anyhow::Result;
use clientpack_lib::application::cli::Commands;
use clientpack_lib::application::commands::execute_command_with_session;
use clientpack_lib::client::ConfigStore;
use clientpack_tests::{HermeticSessionBuilder, MockBehavior};
use std::fs;

fn build(packages: &[&str]) -> Commands {
    Commands::Build {
        packages: packages.iter().map(|s| s.to_string()).collect(),
        contributor: "app".to_string(),
    }
}

#[test]
fn e2e_build_publishes_aliased_modules() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::npm_bundling(&["htm", "app_left_pad"]))?
        .build()?;
    let workdir = test_env.work_path.join("client");

    execute_command_with_session(build(&["left-pad@^1.3.0"]), &session)?;

    assert_eq!(
        test_env.get_mock_calls("npm")?,
        vec!["install app_left_pad@npm:left-pad@^1.3.0", "run build"]
    );
    assert!(workdir.join("app/build/web_modules/app_left_pad.js").is_file());
    assert!(workdir.join("app/build/index.html").is_file());

    // Template untouched apart from its build output
    let template = fs::read_to_string(workdir.join("app/package.json"))?;
    assert!(!template.contains("app_left_pad"));

    let store = ConfigStore::open(workdir.join(".clientpack/build-config.json"))?;
    assert_eq!(store.all_aliases(), vec!["app_left_pad"]);
    Ok(())
}

#[test]
fn e2e_build_collects_contributor_declarations() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_contributor("charts", "[[dependency]]\npackage = \"d3@7\"\n")?
        .with_contributor(
            "editor",
            "name = \"Editor\"\n\n[[dependency]]\npackage = \"@codemirror/view\"\nextra_exports = [\"EditorView\"]\n",
        )?
        .with_contributor("broken", "[[dependency]]\npackage = 42\n")?
        .with_mock_executable(
            "npm",
            MockBehavior::npm_bundling(&["htm", "charts_d3", "editor_codemirror_view"]),
        )?
        .build()?;

    execute_command_with_session(build(&[]), &session)?;

    assert!(test_env.verify_mock_call(
        "npm",
        &[
            "install",
            "charts_d3@npm:d3@7",
            "editor_codemirror_view@npm:@codemirror/view"
        ]
    )?);
    let workdir = test_env.work_path.join("client");
    assert!(
        workdir
            .join("app/build/web_modules/editor_codemirror_view.js")
            .is_file()
    );
    Ok(())
}

#[test]
fn e2e_build_install_failure_keeps_live_tree() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::npm_failing_install("E404 left-pad@99"))?
        .build()?;
    let workdir = test_env.work_path.join("client");
    let live = workdir.join("app/build/web_modules");
    fs::create_dir_all(&live)?;
    fs::write(live.join("htm.js"), "export default 1;\n")?;

    let err = execute_command_with_session(build(&["left-pad@99"]), &session).unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("install"), "unexpected error: {}", message);
    assert!(message.contains("E404 left-pad@99"), "unexpected error: {}", message);
    assert_eq!(test_env.get_mock_calls("npm")?.len(), 1);
    assert_eq!(fs::read_to_string(live.join("htm.js"))?, "export default 1;\n");
    Ok(())
}

#[test]
fn e2e_build_without_output_fails() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::AlwaysSucceed)?
        .build()?;

    let err = execute_command_with_session(build(&[]), &session).unwrap_err();

    assert!(format!("{:#}", err).contains("no output"));
    assert!(!test_env.work_path.join("client/app/build").exists());
    Ok(())
}

#[test]
fn e2e_build_with_missing_template() -> Result<()> {
    let builder = HermeticSessionBuilder::new()?;
    let workdir = builder.test_env().work_path.clone();
    let (session, test_env) = builder
        .with_workdir(workdir)
        .with_mock_executable("npm", MockBehavior::AlwaysSucceed)?
        .build()?;

    let err = execute_command_with_session(build(&[]), &session).unwrap_err();

    assert!(format!("{:#}", err).contains("does not exist"));
    assert!(test_env.get_mock_calls("npm")?.is_empty());
    Ok(())
}
