//! Small lexical helpers shared by both parsers

/// Split on `sep` where it is not nested inside `<>`, `()`, `[]` or `{}`
pub(crate) fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (idx, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Position of the first `sep` outside any bracket pair
pub(crate) fn find_top_level(s: &str, sep: char) -> Option<usize> {
    let mut depth: usize = 0;
    for (idx, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Strip one pair of surrounding double quotes
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Quote a name for rendering when it is not a bare identifier
pub(crate) fn quote_if_needed(s: &str) -> String {
    if is_identifier(s) {
        s.to_string()
    } else {
        format!("\"{s}\"")
    }
}
