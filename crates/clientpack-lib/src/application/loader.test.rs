use super::*;
use crate::primitives::ColorIntent;

#[test]
fn test_cli_color_overrides_environment() {
    let env_color = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    }
    .apply_color_config(ColorIntent::Auto);
    let base = AppConfig {
        color: env_color,
        ..AppConfig::default()
    };

    let merged = base.merge_with(AppConfig {
        color: ColorIntent::Always,
        ..AppConfig::default()
    });
    assert_eq!(merged.color, ColorIntent::Always);
}

#[test]
fn test_environment_color_survives_default_cli() {
    let base = AppConfig {
        color: ColorIntent::Never,
        ..AppConfig::default()
    };

    let merged = base.merge_with(AppConfig::default());
    assert_eq!(merged.color, ColorIntent::Never);
}
