use super::*;

#[test]
fn test_filter_directive_scopes_crate_level() {
    let directive = filter_directive(LogLevel::Debug);
    assert!(directive.starts_with("warn,"));
    assert!(directive.contains("clientpack=debug"));
    assert!(directive.contains("clientpack_lib=debug"));
}

#[test]
fn test_filter_directive_is_parseable() {
    for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
        let directive = filter_directive(level);
        assert!(directive.parse::<EnvFilter>().is_ok(), "{directive}");
    }
}

#[test]
fn test_global_matches_initialization_flag() {
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}
