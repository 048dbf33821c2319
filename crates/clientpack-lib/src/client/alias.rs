//! Dependency alias derivation
//!
//! Every `(contributor, package)` pair is installed under an npm alias so two
//! contributors can depend on the same package without clobbering each other.
//! The functions here are pure; the store records the chosen alias.

/// Lowercase `input` and collapse every run of characters outside `[a-z0-9]`
/// into a single `_`, trimming underscores from both ends.
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }

    out
}

/// Strip a version requirement from an npm package spec.
///
/// `left-pad@^1.3.0` becomes `left-pad`; scoped names keep their leading `@`,
/// so `@scope/pkg@2` becomes `@scope/pkg`.
pub fn bare_package_name(spec: &str) -> &str {
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(idx) => &spec[..search_from + idx],
        None => spec,
    }
}

/// Stands in for a contributor name with no ASCII letters or digits
pub const FALLBACK_CONTRIBUTOR: &str = "contrib";
/// Stands in for a package name with no ASCII letters or digits
pub const FALLBACK_PACKAGE: &str = "pkg";

/// Alias derived purely from the pair, before collision handling.
pub fn derive_alias(contributor: &str, package_name: &str) -> String {
    let prefix = non_empty_or(slug(contributor), FALLBACK_CONTRIBUTOR);
    let name = non_empty_or(slug(bare_package_name(package_name)), FALLBACK_PACKAGE);
    format!("{}_{}", prefix, name)
}

fn non_empty_or(slug: String, fallback: &str) -> String {
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Preferred aliases are matched and stored in lowercase.
pub fn normalize(alias: &str) -> String {
    alias.trim().to_ascii_lowercase()
}

/// Alias equality as seen by a case-insensitive filesystem
pub fn same_alias(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Pick the first free alias starting from `base`, trying `base_2`, `base_3`, ...
pub fn first_free<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(base) {
        return base.to_string();
    }

    (2usize..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Aliases become file names under `web_modules/` and npm alias names.
///
/// npm rejects uppercase names and names starting with `_` or `.`, so an
/// alias is `[a-z0-9][a-z0-9_-]*`.
pub fn is_filesystem_safe(alias: &str) -> bool {
    let lower_alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let mut chars = alias.chars();
    match chars.next() {
        Some(first) if lower_alnum(first) => {}
        _ => return false,
    }
    chars.all(|c| lower_alnum(c) || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    include!("alias.test.rs");
}
