use super::*;
use std::collections::HashSet;

#[test]
fn test_slug_basic() {
    assert_eq!(slug("A"), "a");
    assert_eq!(slug("left-pad"), "left_pad");
    assert_eq!(slug("pkg.x"), "pkg_x");
    assert_eq!(slug("@material-ui/core"), "material_ui_core");
    assert_eq!(slug("--weird__Name--"), "weird_name");
    assert_eq!(slug(""), "");
}

#[test]
fn test_bare_package_name() {
    assert_eq!(bare_package_name("left-pad"), "left-pad");
    assert_eq!(bare_package_name("left-pad@^1.3.0"), "left-pad");
    assert_eq!(bare_package_name("@scope/pkg"), "@scope/pkg");
    assert_eq!(bare_package_name("@scope/pkg@2"), "@scope/pkg");
    assert_eq!(bare_package_name("@"), "@");
}

#[test]
fn test_derive_alias() {
    assert_eq!(derive_alias("A", "left-pad"), "a_left_pad");
    assert_eq!(derive_alias("B", "left-pad@^1.3.0"), "b_left_pad");
    assert_eq!(
        derive_alias("pkg.x", "@material-ui/core@4"),
        "pkg_x_material_ui_core"
    );
}

#[test]
fn test_first_free_without_collision() {
    assert_eq!(first_free("a_left_pad", |_| false), "a_left_pad");
}

#[test]
fn test_first_free_suffixes_until_free() {
    let taken: HashSet<&str> = ["a_b", "a_b_2"].into_iter().collect();
    assert_eq!(first_free("a_b", |c| taken.contains(c)), "a_b_3");
}

#[test]
fn test_is_filesystem_safe() {
    assert!(is_filesystem_safe("a_left_pad"));
    assert!(is_filesystem_safe("react-dom"));
    assert!(!is_filesystem_safe(""));
    assert!(!is_filesystem_safe("../escape"));
    assert!(!is_filesystem_safe("a/b"));
    assert!(!is_filesystem_safe("-flag"));
    assert!(!is_filesystem_safe("has space"));
}

#[test]
fn test_npm_rejected_names_are_unsafe() {
    assert!(!is_filesystem_safe("_left_pad"));
    assert!(!is_filesystem_safe(".hidden"));
    assert!(!is_filesystem_safe("ReactAlias"));
    assert!(is_filesystem_safe("2d_charts"));
}

#[test]
fn test_derive_alias_falls_back_for_empty_slugs() {
    assert_eq!(derive_alias("日本", "left-pad"), "contrib_left_pad");
    assert_eq!(derive_alias("app", "@/"), "app_pkg");
    assert!(is_filesystem_safe(&derive_alias("日本", "日本")));
}

#[test]
fn test_normalize_and_same_alias() {
    assert_eq!(normalize(" ReactAlias "), "reactalias");
    assert!(same_alias("ReactAlias", "reactalias"));
    assert!(!same_alias("react", "react_2"));
}
