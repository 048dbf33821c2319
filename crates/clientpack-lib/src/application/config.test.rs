use super::*;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 0);
    assert_eq!(config.npm, "npm");
    assert_eq!(config.url_prefix, "../");
    assert_eq!(config.color, ColorIntent::Auto);
    assert!(config.workdir.is_none());
}

#[test]
fn test_config_merging() {
    let base = AppConfig {
        npm: "pnpm".to_string(),
        ..AppConfig::default()
    };
    let override_config = AppConfig {
        log_level: 4,
        color: ColorIntent::Always,
        workdir: Some(PathBuf::from("/srv/site")),
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorIntent::Always);
    assert_eq!(merged.workdir, Some(PathBuf::from("/srv/site")));
    assert_eq!(merged.npm, "pnpm");
}

#[test]
fn test_layout_defaults_follow_workdir() {
    let config = AppConfig {
        workdir: Some(PathBuf::from("/srv/site")),
        ..AppConfig::default()
    };

    assert_eq!(config.layout(), ClientLayout::for_workdir(Path::new("/srv/site")));
}

#[test]
fn test_layout_overrides() {
    let config = AppConfig {
        workdir: Some(PathBuf::from("/srv/site")),
        app_dir: Some(PathBuf::from("frontend")),
        contrib_dir: Some(PathBuf::from("/etc/clientpack/contributors")),
        url_prefix: "/static/".to_string(),
        ..AppConfig::default()
    };

    let layout = config.layout();
    assert_eq!(layout.app_dir, PathBuf::from("/srv/site/frontend"));
    assert_eq!(layout.build_dir, PathBuf::from("/srv/site/frontend/build"));
    assert_eq!(
        layout.contrib_dir,
        PathBuf::from("/etc/clientpack/contributors")
    );
    assert_eq!(layout.url_prefix, "/static/");

    let config = AppConfig {
        build_dir: Some(PathBuf::from("public")),
        ..config
    };
    assert_eq!(config.layout().build_dir, PathBuf::from("/srv/site/public"));
}

#[test]
fn test_validate_resolves_workdir() {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        ..AppConfig::default()
    };

    config.validate().unwrap();
    assert_eq!(config.workdir.as_deref(), Some(temp.path()));
}

#[test]
fn test_validate_rejects_missing_workdir() {
    let temp = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().join("missing")),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

#[test]
fn test_logger_config_from_app_config() {
    let config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Debug);
    assert_eq!(logger.format, LogFormat::Json);
    assert!(!logger.color);
}
