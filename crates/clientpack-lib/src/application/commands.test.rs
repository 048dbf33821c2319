use super::*;
use crate::application::config::AppConfig;
use crate::application::session::ProcessOutput;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::testing::{ClientFixture, emit_bundle};

fn config_for(fixture: &ClientFixture) -> AppConfig {
    AppConfig {
        workdir: Some(fixture.path().to_path_buf()),
        ..AppConfig::default()
    }
}

fn bundling_process() -> MockProcessProvider {
    MockProcessProvider::new().with_side_effect("npm", &["run", "build"], emit_bundle)
}

fn session_for(fixture: &ClientFixture, process: MockProcessProvider) -> MockCommandSession {
    MockCommandSession::new()
        .with_process(process)
        .with_app_config(config_for(fixture))
}

mod handle_version_tests {
    use super::*;

    #[test]
    fn it_displays_version_information() {
        let session = MockCommandSession::new();

        handle_version(&session).unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
            text: format!("clientpack {}", env!("CARGO_PKG_VERSION")),
        }));
    }
}

mod handle_build_tests {
    use super::*;

    #[test]
    fn it_registers_packages_and_publishes() {
        let fixture = ClientFixture::new().unwrap();
        let session = session_for(&fixture, bundling_process());

        execute_command_with_session(
            Commands::Build {
                packages: vec!["left-pad@^1.3.0".to_string()],
                contributor: "app".to_string(),
            },
            &session,
        )
        .unwrap();

        let calls = session.process_provider.get_calls_for_command("npm");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["install", "app_left_pad@npm:left-pad@^1.3.0"]);
        assert_eq!(calls[1].args, vec!["run", "build"]);
        assert!(fixture.file_exists("app/build/web_modules/app_left_pad.js"));

        let store = fixture.open_store().unwrap();
        assert_eq!(
            store.get_alias("app", "left-pad@^1.3.0"),
            Some("app_left_pad".to_string())
        );
    }

    #[test]
    fn it_uses_the_configured_package_manager() {
        let fixture = ClientFixture::new().unwrap();
        let process =
            MockProcessProvider::new().with_side_effect("pnpm", &["run", "build"], emit_bundle);
        let session = MockCommandSession::new()
            .with_process(process)
            .with_app_config(AppConfig {
                npm: "pnpm".to_string(),
                ..config_for(&fixture)
            });

        handle_build(&session, vec![], "app".to_string()).unwrap();

        assert_eq!(session.process_provider.get_calls_for_command("pnpm").len(), 2);
        assert!(session.process_provider.get_calls_for_command("npm").is_empty());
    }

    #[test]
    fn it_reports_failed_install_with_stderr() {
        let fixture = ClientFixture::new().unwrap();
        fixture.write_live_module("old", "export default 1;\n").unwrap();
        let process = MockProcessProvider::new().with_result(
            "npm".to_string(),
            vec!["install".to_string(), "app_nope@npm:nope".to_string()],
            Ok(ProcessOutput::failure(1, "404 Not Found - nope")),
        );
        let session = session_for(&fixture, process);

        let err = handle_build(&session, vec!["nope".to_string()], "app".to_string()).unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("install"));
        assert!(message.contains("404 Not Found - nope"));
        // Build step never ran and the old bundle is still there
        assert_eq!(session.process_provider.get_calls().len(), 1);
        assert!(fixture.file_exists("app/build/web_modules/old.js"));
    }

    #[test]
    fn it_warns_about_failed_contributors() {
        let fixture = ClientFixture::new().unwrap();
        fixture
            .write_contributor("good", "[[dependency]]\npackage = \"htm\"\n")
            .unwrap();
        fixture
            .write_contributor("broken", "this is not toml = [")
            .unwrap();
        let session = session_for(&fixture, bundling_process());

        handle_build(&session, vec![], "app".to_string()).unwrap();

        assert!(fixture.file_exists("app/build/web_modules/good_htm.js"));
        let errors = session.display_provider.count_calls("status_error");
        assert_eq!(errors, 1);
        assert_eq!(session.display_provider.count_calls("status_warning"), 1);
    }
}

mod handle_restore_tests {
    use super::*;

    #[test]
    fn it_forgets_aliases_after_rebuild() {
        let fixture = ClientFixture::new().unwrap();
        let session = session_for(&fixture, bundling_process());
        handle_build(&session, vec!["left-pad".to_string()], "custom".to_string()).unwrap();

        handle_restore(&session).unwrap();

        let store = fixture.open_store().unwrap();
        assert!(store.all_aliases().is_empty());
        assert!(!fixture.file_exists("app/build/web_modules/custom_left_pad.js"));
        assert!(fixture.file_exists("app/build/web_modules/htm.js"));

        let installs: Vec<_> = session
            .process_provider
            .get_calls()
            .into_iter()
            .filter(|call| call.args.first().map(String::as_str) == Some("install"))
            .collect();
        assert_eq!(installs.last().unwrap().args, vec!["install"]);
    }
}

mod handle_list_tests {
    use super::*;

    #[test]
    fn it_reports_an_empty_store() {
        let fixture = ClientFixture::new().unwrap();
        let session = session_for(&fixture, MockProcessProvider::new());

        handle_list(&session).unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusInfo {
            message: "No client dependencies registered".to_string(),
        }));
    }

    #[test]
    fn it_lists_registered_aliases() {
        let fixture = ClientFixture::new().unwrap();
        let store = fixture.open_store().unwrap();
        store
            .transact(|tx| {
                tx.update(vec![
                    DependencyEntry::new("A", "left-pad"),
                    DependencyEntry::new("B", "left-pad").with_extra_exports(["pad"]),
                ]);
                Ok::<_, crate::client::StoreError>(())
            })
            .unwrap();
        let session = session_for(&fixture, MockProcessProvider::new());

        handle_list(&session).unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusList {
            items: vec![
                "A left-pad -> a_left_pad".to_string(),
                "B left-pad -> b_left_pad (+pad)".to_string(),
            ],
        }));
    }
}

mod handle_discover_tests {
    use super::*;

    #[test]
    fn it_previews_without_writing_the_store() {
        let fixture = ClientFixture::new().unwrap();
        fixture
            .write_contributor("charts", "[[dependency]]\npackage = \"d3\"\n")
            .unwrap();
        let session = session_for(&fixture, MockProcessProvider::new());

        handle_discover(&session).unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusSuccess {
            item: "charts d3".to_string(),
            details: "charts_d3".to_string(),
        }));
        assert!(!fixture.file_exists(".clientpack/build-config.json"));
        assert!(session.process_provider.get_calls().is_empty());
    }

    #[test]
    fn it_handles_missing_contributor_directory() {
        let fixture = ClientFixture::new().unwrap();
        let session = session_for(&fixture, MockProcessProvider::new());

        handle_discover(&session).unwrap();

        assert_eq!(session.display_provider.count_calls("status_info"), 1);
    }
}

mod artifact_command_tests {
    use super::*;

    fn built_fixture() -> (ClientFixture, MockCommandSession) {
        let fixture = ClientFixture::new().unwrap();
        let session = session_for(&fixture, bundling_process());
        handle_build(&session, vec!["left-pad".to_string()], "app".to_string()).unwrap();
        session.display_provider.clear_calls();
        (fixture, session)
    }

    #[test]
    fn it_prints_module_url() {
        let (_fixture, session) = built_fixture();

        handle_url(&session, "app", "left-pad").unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
            text: "../web_modules/app_left_pad.js".to_string(),
        }));
    }

    #[test]
    fn it_fails_for_unknown_module_url() {
        let (_fixture, session) = built_fixture();

        assert!(handle_url(&session, "pkgA", "react").is_err());
    }

    #[test]
    fn it_lists_module_exports() {
        let (_fixture, session) = built_fixture();

        handle_exports(&session, "app", "left-pad").unwrap();

        assert!(session.display_provider.has_call(&DisplayCall::StatusList {
            items: vec!["default".to_string(), "name".to_string()],
        }));
    }

    #[test]
    fn it_reports_no_exports_for_unknown_pair() {
        let (_fixture, session) = built_fixture();

        handle_exports(&session, "pkgA", "react").unwrap();

        assert_eq!(session.display_provider.count_calls("status_info"), 1);
    }

    #[test]
    fn it_resolves_existing_paths() {
        let (fixture, session) = built_fixture();

        handle_path(&session, "web_modules/app_left_pad.js").unwrap();

        let expected = fixture
            .layout
            .build_dir
            .join("web_modules")
            .join("app_left_pad.js");
        assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
            text: expected.display().to_string(),
        }));
    }

    #[test]
    fn it_rejects_absolute_paths() {
        let (_fixture, session) = built_fixture();

        let err = handle_path(&session, "/etc/passwd").unwrap_err();

        assert!(err.downcast_ref::<crate::client::InvalidPathError>().is_some());
    }

    #[test]
    fn it_fails_for_missing_paths() {
        let (_fixture, session) = built_fixture();

        let err = handle_path(&session, "missing/file.js").unwrap_err();

        assert!(err.downcast_ref::<crate::client::InvalidPathError>().is_none());
    }
}
