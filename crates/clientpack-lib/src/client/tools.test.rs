use super::*;
use crate::application::session_mocks::MockProcessProvider;
use std::path::PathBuf;

#[test]
fn test_npm_install_passes_alias_specs() {
    let process = MockProcessProvider::new();
    let tool = NpmTool::new("npm", &process);
    let cwd = PathBuf::from("/stage/app");

    let output = tool
        .install(&["a_left_pad@npm:left-pad".to_string()], &cwd)
        .unwrap();

    assert!(output.success);
    let calls = process.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, "npm");
    assert_eq!(calls[0].args, vec!["install", "a_left_pad@npm:left-pad"]);
    assert_eq!(calls[0].working_dir, cwd);
}

#[test]
fn test_npm_install_without_packages() {
    let process = MockProcessProvider::new();
    let tool = NpmTool::new("npm", &process);

    tool.install(&[], Path::new("/stage/app")).unwrap();

    assert_eq!(process.get_calls()[0].args, vec!["install"]);
}

#[test]
fn test_npm_build_runs_build_script() {
    let process = MockProcessProvider::new();
    let tool = NpmTool::new("/opt/node/bin/npm", &process);

    tool.build(Path::new("/stage/app")).unwrap();

    let calls = process.get_calls();
    assert_eq!(calls[0].command, "/opt/node/bin/npm");
    assert_eq!(calls[0].args, vec!["run", "build"]);
}

#[test]
fn test_failed_exit_is_returned_not_raised() {
    let process = MockProcessProvider::new().with_result(
        "npm".to_string(),
        vec!["run".to_string(), "build".to_string()],
        Ok(ProcessOutput::failure(1, "bundler exploded")),
    );
    let tool = NpmTool::new("npm", &process);

    let output = tool.build(Path::new("/stage/app")).unwrap();

    assert!(!output.success);
    assert_eq!(output.status, Some(1));
    assert_eq!(output.stderr, "bundler exploded");
}

#[test]
fn test_command_line() {
    let process = MockProcessProvider::new();
    let tool = NpmTool::new("npm", &process);

    assert_eq!(
        tool.command_line(ToolStep::Install, &["x@npm:y".to_string()]),
        "npm install x@npm:y"
    );
    assert_eq!(tool.command_line(ToolStep::Build, &[]), "npm run build");
    assert_eq!(ToolStep::Install.to_string(), "install");
}
