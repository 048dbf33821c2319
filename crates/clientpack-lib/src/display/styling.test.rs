use super::*;

#[test]
fn test_plain_formatting_has_no_escape_codes() {
    let styling = StyleManager::plain();
    assert_eq!(styling.format_success("built"), "+ built");
    assert_eq!(styling.format_error("widgets"), "x widgets");
    assert_eq!(styling.format_warning("careful"), "! careful");
    assert_eq!(styling.format_info("note"), "- note");
    assert_eq!(styling.format_list_item("a_left_pad"), "  * a_left_pad");
}

#[test]
fn test_colored_formatting_wraps_text() {
    let styling = StyleManager {
        colors: true,
        unicode: true,
    };
    let line = styling.format_error("widgets failed");
    assert!(line.contains("✗ widgets failed"));
    assert!(line.contains('\u{1b}'), "expected ANSI escape in {line:?}");
}

#[test]
fn test_tick_strings_end_with_finished_frame() {
    assert_eq!(StyleManager::plain().tick_strings().last(), Some(&"+"));
}
