//! Naming convention for ids and classes: all-lowercase alphanumeric
//! segments separated by single hyphens (kebab-case).

/// True when `name` consists of `[a-z0-9]+` segments joined by single hyphens.
pub(crate) fn is_conventional(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut prev_was_hyphen = true; // a leading hyphen is invalid
    for b in name.bytes() {
        match b {
            b'a'..=b'z' | b'0'..=b'9' => prev_was_hyphen = false,
            b'-' => {
                if prev_was_hyphen {
                    return false;
                }
                prev_was_hyphen = true;
            }
            _ => return false,
        }
    }
    !prev_was_hyphen // a trailing hyphen is invalid
}

/// Derive the kebab-case spelling of a camelCase/PascalCase/snake_case name.
///
/// Applied as sequential passes, in this order: underscores become hyphens;
/// a leading uppercase letter is lowercased in place; an uppercase letter
/// right after a hyphen is lowercased in place; every remaining uppercase
/// letter gets a hyphen prefix and is lowercased.
pub(crate) fn suggest(name: &str) -> String {
    let mut chars: Vec<char> = name
        .chars()
        .map(|c| if c == '_' { '-' } else { c })
        .collect();

    if let Some(first) = chars.first_mut()
        && first.is_ascii_uppercase()
    {
        *first = first.to_ascii_lowercase();
    }

    for k in 1..chars.len() {
        if chars[k - 1] == '-' && chars[k].is_ascii_uppercase() {
            chars[k] = chars[k].to_ascii_lowercase();
        }
    }

    let mut out = String::with_capacity(chars.len() + 4);
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
