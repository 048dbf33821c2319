//! E2E tests for restore and the artifact lookups

use anyhow::Result;
use clientpack_lib::application::cli::Commands;
use clientpack_lib::application::commands::execute_command_with_session;
use clientpack_lib::client::{BuildArtifacts, ConfigStore};
use clientpack_tests::{ConditionalRule, HermeticSessionBuilder, MockBehavior};

#[test]
fn e2e_restore_rebuilds_pristine_template() -> Result<()> {
    // First build emits the custom module, the restore build only the template's
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::npm_bundling(&["htm", "custom_left_pad"]))?
        .build()?;
    let workdir = test_env.work_path.join("client");

    execute_command_with_session(
        Commands::Build {
            packages: vec!["left-pad".to_string()],
            contributor: "custom".to_string(),
        },
        &session,
    )?;
    assert!(workdir.join("app/build/web_modules/custom_left_pad.js").is_file());

    let mut test_env = test_env;
    test_env.add_mock_executable(
        "npm",
        MockBehavior::Conditional {
            rules: vec![ConditionalRule::new(
                &["run", "build"],
                MockBehavior::EmitModules {
                    aliases: vec!["htm".to_string()],
                },
            )],
        },
    )?;

    execute_command_with_session(Commands::Restore, &session)?;

    assert!(!workdir.join("app/build/web_modules/custom_left_pad.js").exists());
    assert!(workdir.join("app/build/web_modules/htm.js").is_file());
    assert!(test_env.get_mock_calls("npm")?.contains(&"install".to_string()));

    let store = ConfigStore::open(workdir.join(".clientpack/build-config.json"))?;
    let layout = clientpack_lib::client::ClientLayout::for_workdir(&workdir);
    let artifacts = BuildArtifacts::new(&store, &layout);
    assert_eq!(artifacts.module_url("custom", "left-pad"), None);
    Ok(())
}

#[test]
fn e2e_restore_failure_keeps_aliases() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::npm_bundling(&["htm", "app_htm"]))?
        .build()?;
    let workdir = test_env.work_path.join("client");
    execute_command_with_session(
        Commands::Build {
            packages: vec!["htm".to_string()],
            contributor: "app".to_string(),
        },
        &session,
    )?;

    let mut test_env = test_env;
    test_env.add_mock_executable(
        "npm",
        MockBehavior::AlwaysFail {
            error: "network down".to_string(),
        },
    )?;

    assert!(execute_command_with_session(Commands::Restore, &session).is_err());

    let store = ConfigStore::open(workdir.join(".clientpack/build-config.json"))?;
    assert_eq!(store.all_aliases(), vec!["app_htm"]);
    assert!(workdir.join("app/build/web_modules/app_htm.js").is_file());
    Ok(())
}

#[test]
fn e2e_path_and_url_lookups() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_client_project("client")?
        .with_mock_executable("npm", MockBehavior::npm_bundling(&["htm", "app_left_pad"]))?
        .build()?;
    execute_command_with_session(
        Commands::Build {
            packages: vec!["left-pad".to_string()],
            contributor: "app".to_string(),
        },
        &session,
    )?;

    execute_command_with_session(
        Commands::Url {
            contributor: "app".to_string(),
            package: "left-pad".to_string(),
        },
        &session,
    )?;
    execute_command_with_session(
        Commands::Path {
            relative_path: "web_modules/htm.js".to_string(),
        },
        &session,
    )?;

    assert!(
        execute_command_with_session(
            Commands::Path {
                relative_path: "/etc/passwd".to_string(),
            },
            &session,
        )
        .is_err()
    );
    assert!(
        execute_command_with_session(
            Commands::Url {
                contributor: "pkgA".to_string(),
                package: "react".to_string(),
            },
            &session,
        )
        .is_err()
    );
    Ok(())
}
