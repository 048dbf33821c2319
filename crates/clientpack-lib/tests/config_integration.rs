use clientpack_lib::application::config::AppConfig;
use clientpack_lib::primitives::ColorIntent;
use std::path::PathBuf;

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert_eq!(config.npm, "npm");
    assert_eq!(config.color, ColorIntent::Auto);
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig::default();
    let override_config = AppConfig {
        log_level: 3,
        npm: "pnpm".to_string(),
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.npm, "pnpm");
    assert_eq!(merged.color, ColorIntent::Never);
    assert_eq!(merged.url_prefix, "../");
}

#[test]
fn test_layout_follows_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = AppConfig {
        workdir: Some(temp.path().to_path_buf()),
        app_dir: Some(PathBuf::from("frontend")),
        url_prefix: "/static/".to_string(),
        ..AppConfig::default()
    };
    config.validate().unwrap();

    let layout = config.layout();

    assert_eq!(layout.app_dir, temp.path().join("frontend"));
    assert_eq!(layout.build_dir, temp.path().join("frontend").join("build"));
    assert_eq!(layout.url_prefix, "/static/");
}
