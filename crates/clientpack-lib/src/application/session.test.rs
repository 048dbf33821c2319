use super::*;

#[test]
fn test_process_output_constructors() {
    let ok = ProcessOutput::succeeded("done");
    assert!(ok.success);
    assert_eq!(ok.status, Some(0));
    assert_eq!(ok.stdout, "done");

    let failed = ProcessOutput::failure(2, "boom");
    assert!(!failed.success);
    assert_eq!(failed.status, Some(2));
    assert_eq!(failed.stderr, "boom");
}

#[test]
fn test_new_for_test_prepends_bin_path() {
    let provider = LiveProcessProvider::new_for_test(Some("/tmp/mock-bin".to_string()));
    assert!(provider.custom_path().unwrap().starts_with("/tmp/mock-bin"));

    assert!(LiveProcessProvider::new_for_test(None).custom_path().is_none());
}

#[cfg(unix)]
#[test]
fn test_custom_path_resolves_mock_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().unwrap();
    let bin = temp.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let script = bin.join("fake-npm");
    std::fs::write(&script, "#!/bin/sh\necho \"ran $*\"\nexit 3\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let provider = LiveProcessProvider::new_for_test(Some(bin.display().to_string()));
    let output = provider
        .execute("fake-npm", &["run", "build"], temp.path())
        .unwrap();

    assert!(!output.success);
    assert_eq!(output.status, Some(3));
    assert_eq!(output.stdout.trim(), "ran run build");
}

#[test]
fn test_missing_program_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let provider = LiveProcessProvider::with_custom_path(temp.path().display().to_string());

    assert!(
        provider
            .execute("clientpack-no-such-program", &[], temp.path())
            .is_err()
    );
}
