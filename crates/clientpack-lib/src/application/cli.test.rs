use super::*;
use crate::primitives::ColorIntent;
use std::path::PathBuf;

#[test]
fn test_build_defaults_to_app_contributor() {
    let cli = Cli::try_parse_from(["clientpack", "build", "left-pad@^1.3.0", "@scope/pkg"]).unwrap();

    assert_eq!(
        cli.command,
        Some(Commands::Build {
            packages: vec!["left-pad@^1.3.0".to_string(), "@scope/pkg".to_string()],
            contributor: "app".to_string(),
        })
    );
}

#[test]
fn test_build_with_contributor() {
    let cli = Cli::try_parse_from(["clientpack", "build", "--contributor", "widgets", "react"])
        .unwrap();

    assert_eq!(
        cli.command,
        Some(Commands::Build {
            packages: vec!["react".to_string()],
            contributor: "widgets".to_string(),
        })
    );
}

#[test]
fn test_global_options_before_subcommand() {
    let cli = Cli::try_parse_from([
        "clientpack",
        "--workdir",
        "/srv/site",
        "--color",
        "never",
        "--npm",
        "pnpm",
        "url",
        "A",
        "left-pad",
    ])
    .unwrap();

    assert_eq!(cli.config.workdir, Some(PathBuf::from("/srv/site")));
    assert_eq!(cli.config.color, ColorIntent::Never);
    assert_eq!(cli.config.npm, "pnpm");
    assert_eq!(
        cli.command,
        Some(Commands::Url {
            contributor: "A".to_string(),
            package: "left-pad".to_string(),
        })
    );
}

#[test]
fn test_path_and_exports_parse() {
    let cli = Cli::try_parse_from(["clientpack", "path", "web_modules/x.js"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Path {
            relative_path: "web_modules/x.js".to_string()
        })
    );

    let cli = Cli::try_parse_from(["clientpack", "exports", "A", "left-pad"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Exports { .. })));
}

#[test]
fn test_no_subcommand_is_allowed() {
    let cli = Cli::try_parse_from(["clientpack"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_runs_external_tools() {
    assert!(Commands::Restore.runs_external_tools());
    assert!(!Commands::List.runs_external_tools());
}
