use super::*;

#[test]
fn test_default_and_named_declarations() {
    let source = r#"
export default function leftPad(str, len) {}
export function helper() {}
export async function load() {}
export class Widget {}
export const VERSION = "1.3.0";
export let counter = 0;
export var legacy = true;
"#;

    assert_eq!(
        find_js_module_exports(source),
        vec!["default", "helper", "load", "Widget", "VERSION", "counter", "legacy"]
    );
}

#[test]
fn test_export_lists_use_exported_names() {
    let source = "const a = 1, b = 2;\nexport { a, b as beta };\nexport {c as default} from './c.js';";

    assert_eq!(find_js_module_exports(source), vec!["a", "beta", "default"]);
}

#[test]
fn test_star_reexports_are_ignored() {
    let source = "export * from './common.js';\nexport const x = 1;";
    assert_eq!(find_js_module_exports(source), vec!["x"]);
}

#[test]
fn test_deduplicates_in_first_appearance_order() {
    let source = "export { h };\nexport default h;\nexport { h as default };\nexport function h() {}";
    assert_eq!(find_js_module_exports(source), vec!["h", "default"]);
}

#[test]
fn test_minified_bundle() {
    let source = "function e(){}const t=1;export{e as render,t as h};export default e;";
    assert_eq!(
        find_js_module_exports(source),
        vec!["render", "h", "default"]
    );
}

#[test]
fn test_generator_and_dollar_names() {
    let source = "export function* gen() {}\nexport const $store = {};";
    assert_eq!(find_js_module_exports(source), vec!["gen", "$store"]);
}

#[test]
fn test_no_exports() {
    assert!(find_js_module_exports("console.log('hi');").is_empty());
    assert!(find_js_module_exports("").is_empty());
}

#[test]
fn test_multiple_declarators() {
    let source = "export const a = 1, b = 2;\nexport let c = f(1, 2), d = [3, 4], e = { x: 1, y: 2 };\nexport var g,\n  h = 'x, y';";
    assert_eq!(
        find_js_module_exports(source),
        vec!["a", "b", "c", "d", "e", "g", "h"]
    );
}

#[test]
fn test_declaration_ends_at_line_break() {
    let source = "export const a = 1\nlet b, c = 2\nexport const d = 3;";
    assert_eq!(find_js_module_exports(source), vec!["a", "d"]);
}

#[test]
fn test_comments_and_strings_are_skipped() {
    let source = r#"
// export const commented = 1;
/* export function blocked() {}
   export { hidden }; */
const message = "export const quoted = 1;";
const template = `export default ${message}`;
const escaped = 'it\'s export var tricky';
export const real = 1; // export const trailing = 2;
"#;

    assert_eq!(find_js_module_exports(source), vec!["real"]);
}
