use std::collections::BTreeSet;

/// Names referenced by the selector clauses of `css`: the distinct quoted
/// string literals appearing outside declaration blocks, with any leading
/// `/` stripped. Quotes inside `{}` blocks and comments are ignored.
pub fn selector_names(css: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut chars = css.chars().peekable();
    let mut depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            quote @ ('"' | '\'') => {
                let mut literal = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                literal.push(escaped);
                            }
                        }
                        c if c == quote => break,
                        c => literal.push(c),
                    }
                }
                if depth == 0 {
                    let name = literal.strip_prefix('/').unwrap_or(&literal);
                    names.insert(name.to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// Human-readable change set between two stylesheet generations: additions
/// prefixed `+`, removals prefixed `-`, sorted lexicographically and joined
/// with spaces. Empty iff both stylesheets reference the same names.
pub fn diff(old_css: &str, new_css: &str) -> String {
    let old = selector_names(old_css);
    let new = selector_names(new_css);
    let mut entries: Vec<String> = new
        .difference(&old)
        .map(|name| format!("+{name}"))
        .chain(old.difference(&new).map(|name| format!("-{name}")))
        .collect();
    entries.sort();
    entries.join(" ")
}
