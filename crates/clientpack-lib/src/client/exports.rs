//! Static discovery of ES module export names

use regex::Regex;
use std::sync::LazyLock;

static EXPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\bexport(?:",
        r"\s+(default)\b",
        r"|\s+(?:async\s+)?function\b\s*\*?\s*([A-Za-z_$][\w$]*)",
        r"|\s+class\s+([A-Za-z_$][\w$]*)",
        r"|\s+(?:const|let|var)\s+()",
        r"|\s*\{([^}]*)\}",
        r")"
    ))
    .expect("export pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_$][\w$]*)").expect("identifier pattern is valid"));

/// Names exported by a JS module, in order of first appearance.
///
/// Recognises `export default`, named function/class exports, variable
/// declarations with any number of declarators and export lists (reporting
/// the exported side of `a as b`). Comments and string contents are skipped.
/// Star re-exports and destructuring declarations are not reported.
pub fn find_js_module_exports(source: &str) -> Vec<String> {
    let code = blank_comments_and_strings(source);
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for caps in EXPORT_STATEMENT.captures_iter(&code) {
        if caps.get(1).is_some() {
            push("default");
        } else if let Some(name) = caps.get(2).or_else(|| caps.get(3)) {
            push(name.as_str());
        } else if let Some(rest) = caps.get(4) {
            for declarator in declarators(&code[rest.end()..]) {
                if let Some(name) = IDENTIFIER.captures(declarator).and_then(|c| c.get(1)) {
                    push(name.as_str());
                }
            }
        } else if let Some(list) = caps.get(5) {
            for item in list.as_str().split(',') {
                push(exported_name(item));
            }
        }
    }

    names
}

/// Split a declaration list at top-level commas, stopping at its end.
///
/// The list ends at a top-level `;`, or at a top-level line break that is
/// not next to a comma.
fn declarators(rest: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = rest.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' if depth == 0 => {
                parts.push(&rest[start..i]);
                return parts;
            }
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&rest[start..i]);
                start = i + 1;
            }
            b';' if depth == 0 => {
                parts.push(&rest[start..i]);
                return parts;
            }
            b'\n' if depth == 0 => {
                let before = rest[start..i].trim();
                let after = rest[i + 1..].trim_start();
                if !before.is_empty() && !after.starts_with(',') {
                    parts.push(&rest[start..i]);
                    return parts;
                }
            }
            _ => {}
        }
    }

    parts.push(&rest[start..]);
    parts
}

/// Replace comments and the contents of string and template literals with
/// spaces, keeping byte offsets and line breaks.
fn blank_comments_and_strings(source: &str) -> String {
    enum State {
        Code,
        LineComment,
        BlockComment,
        Literal(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();
    let blank = |out: &mut String, c: char| {
        if c == '\n' {
            out.push('\n');
        } else {
            out.push_str(&" ".repeat(c.len_utf8()));
        }
    };

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '\'' | '"' | '`' => {
                    out.push(c);
                    state = State::Literal(c);
                }
                _ => out.push(c),
            },
            State::LineComment => {
                blank(&mut out, c);
                if c == '\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::Literal(quote) => {
                if c == '\\' {
                    blank(&mut out, c);
                    if let Some(escaped) = chars.next() {
                        blank(&mut out, escaped);
                    }
                } else if c == quote {
                    out.push(c);
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

/// `a` -> `a`, `a as b` -> `b`
fn exported_name(item: &str) -> &str {
    let mut parts = item.split_whitespace();
    let local = parts.next().unwrap_or("");
    match (parts.next(), parts.next()) {
        (Some("as"), Some(exported)) => exported,
        _ => local,
    }
}

#[cfg(test)]
mod tests {
    include!("exports.test.rs");
}
