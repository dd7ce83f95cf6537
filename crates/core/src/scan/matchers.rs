//! Hand-written lexical matchers for the template scanner.
//!
//! Each matcher classifies the *suffix* of the template text that starts at
//! the scanner's cursor. Offsets in the returned structures are relative to
//! that suffix; the scanner adds its cursor position to obtain absolute
//! offsets.
//!
//! # Safety of byte-wise scanning
//!
//! All delimiter and class tests operate on ASCII values (0x00–0x7F). UTF-8
//! continuation bytes are in the range 0x80–0xBF, so they never match any of
//! these tests, and every match boundary lands next to an ASCII byte. This
//! makes byte indexing safe for classification without full UTF-8 decoding,
//! and keeps every returned offset a valid char boundary.

/// Word characters: ASCII letters, digits, and underscore.
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Name characters for tags, attributes, ids, and classes: word bytes plus hyphen.
pub(crate) fn is_name_byte(b: u8) -> bool {
    is_word_byte(b) || b == b'-'
}

fn is_space_byte(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// True when `pat` occurs in `b` at byte offset `i`.
fn at(b: &[u8], i: usize, pat: &[u8]) -> bool {
    b.len() >= i + pat.len() && &b[i..i + pat.len()] == pat
}

/// True when `pat` occurs anywhere in `b` at or after byte offset `from`.
fn contains_from(b: &[u8], from: usize, pat: &[u8]) -> bool {
    (from..b.len()).any(|i| at(b, i, pat))
}

// ── Skip categories ─────────────────────────────────────────────────────

/// Match a directive tag: `<!`, one or more word characters, one whitespace
/// character, any run of non-`>` characters, `>`. Returns the match length.
pub(crate) fn match_directive(suffix: &str) -> Option<usize> {
    let b = suffix.as_bytes();
    if !at(b, 0, b"<!") {
        return None;
    }
    let mut i = 2;
    let word_start = i;
    while i < b.len() && is_word_byte(b[i]) {
        i += 1;
    }
    if i == word_start {
        return None;
    }
    if i >= b.len() || !is_space_byte(b[i]) {
        return None;
    }
    i += 1;
    while i < b.len() && b[i] != b'>' {
        i += 1;
    }
    if i < b.len() { Some(i + 1) } else { None }
}

/// Classification of a suffix that may start with an HTML comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentScan {
    /// The suffix does not begin with `<!--`.
    NotComment,
    /// A well-formed comment; `len` includes the `-->` closer.
    Complete {
        /// Total length of the comment, opener and closer included.
        len: usize,
    },
    /// A second `<!--` appeared before the closer, which does exist later.
    NestedOpener {
        /// Offset of the inner `<!--` relative to the suffix start.
        opener_offset: usize,
    },
    /// `<!--` with no `-->` anywhere in the remaining input.
    Unterminated,
}

/// Classify a comment at the start of the suffix.
///
/// Comments do not nest: the scan stops at whichever of `-->` or a second
/// `<!--` comes first. When the inner opener wins, the presence of a closer
/// anywhere later distinguishes [`CommentScan::NestedOpener`] from
/// [`CommentScan::Unterminated`].
pub(crate) fn scan_comment(suffix: &str) -> CommentScan {
    let b = suffix.as_bytes();
    if !at(b, 0, b"<!--") {
        return CommentScan::NotComment;
    }
    let mut i = 4;
    while i < b.len() {
        if at(b, i, b"-->") {
            return CommentScan::Complete { len: i + 3 };
        }
        if at(b, i, b"<!--") {
            return if contains_from(b, i, b"-->") {
                CommentScan::NestedOpener { opener_offset: i }
            } else {
                CommentScan::Unterminated
            };
        }
        i += 1;
    }
    CommentScan::Unterminated
}

/// Match an interpolation expression: `{{`, the shortest run to `}}`.
/// The body may span lines. Returns the match length.
pub(crate) fn match_interpolation(suffix: &str) -> Option<usize> {
    let b = suffix.as_bytes();
    if !at(b, 0, b"{{") {
        return None;
    }
    let mut i = 2;
    while i < b.len() {
        if at(b, i, b"}}") {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// Match a text run: the maximal non-empty run in which no position starts
/// with `<`, `{{`, or `-->`. Returns the run length.
pub(crate) fn match_text_run(suffix: &str) -> Option<usize> {
    let b = suffix.as_bytes();
    let mut i = 0;
    while i < b.len() {
        if b[i] == b'<' || at(b, i, b"{{") || at(b, i, b"-->") {
            break;
        }
        i += 1;
    }
    if i == 0 { None } else { Some(i) }
}

// ── Tags ────────────────────────────────────────────────────────────────

/// The delimiter form of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    /// `='…'`
    SingleQuoted,
    /// `="…"`
    DoubleQuoted,
    /// `={{…}}` — unquoted interpolation, single-line.
    Expression,
}

/// An attribute value, located by its interior (delimiters excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawValue {
    /// Delimiter form.
    pub kind: ValueKind,
    /// Offset of the first interior byte, relative to the tag start.
    pub start: usize,
    /// Interior length in bytes.
    pub len: usize,
}

/// One attribute inside an opening tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawAttribute {
    /// Offset of the attribute name, relative to the tag start.
    pub name_start: usize,
    /// Name length in bytes.
    pub name_len: usize,
    /// The attribute value, if one of the three value forms followed `=`.
    pub value: Option<RawValue>,
}

/// A matched opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpeningTag {
    /// Total match length, `<` through `>`.
    pub len: usize,
    /// Tag name length; the name starts at offset 1.
    pub name_len: usize,
    /// Attributes in source order.
    pub attributes: Vec<RawAttribute>,
    /// Offset of an XHTML-style `/` before `>`, when present.
    pub slash_offset: Option<usize>,
}

/// Match an opening tag: `<` name attribute* `/`? `>`.
///
/// The attribute grammar is: one or more whitespace bytes, a name of
/// word/hyphen characters, then optionally `=` followed by exactly one of a
/// single-quoted literal, a double-quoted literal, or a `{{…}}` expression.
/// A bare `=` with no recognizable value form is left unconsumed, which
/// makes the whole tag match fail at the closing-`>` check — the attribute
/// grammar has no error recovery of its own.
pub(crate) fn match_opening_tag(suffix: &str) -> Option<OpeningTag> {
    let b = suffix.as_bytes();
    if b.first() != Some(&b'<') {
        return None;
    }
    let mut i = 1;
    while i < b.len() && is_name_byte(b[i]) {
        i += 1;
    }
    let name_len = i - 1;
    if name_len == 0 {
        return None;
    }

    let mut attributes = Vec::new();
    loop {
        // at least one whitespace byte before each attribute name
        let mut j = i;
        while j < b.len() && is_space_byte(b[j]) {
            j += 1;
        }
        if j == i || j >= b.len() || !is_name_byte(b[j]) {
            break;
        }
        let name_start = j;
        while j < b.len() && is_name_byte(b[j]) {
            j += 1;
        }
        let attr_name_len = j - name_start;

        let mut value = None;
        let mut end = j;
        if j < b.len() && b[j] == b'=' {
            if let Some((v, value_end)) = match_attr_value(b, j + 1) {
                value = Some(v);
                end = value_end;
            }
        }
        attributes.push(RawAttribute {
            name_start,
            name_len: attr_name_len,
            value,
        });
        i = end;
    }

    while i < b.len() && is_space_byte(b[i]) {
        i += 1;
    }
    let mut slash_offset = None;
    if i < b.len() && b[i] == b'/' {
        slash_offset = Some(i);
        i += 1;
        while i < b.len() && is_space_byte(b[i]) {
            i += 1;
        }
    }
    if i < b.len() && b[i] == b'>' {
        Some(OpeningTag {
            len: i + 1,
            name_len,
            attributes,
            slash_offset,
        })
    } else {
        None
    }
}

/// Match one of the three attribute-value forms starting at `start`
/// (the byte after `=`). Returns the value and the offset one past it.
fn match_attr_value(b: &[u8], start: usize) -> Option<(RawValue, usize)> {
    match *b.get(start)? {
        quote @ (b'\'' | b'"') => {
            let mut i = start + 1;
            while i < b.len() && b[i] != quote {
                i += 1;
            }
            if i >= b.len() {
                return None;
            }
            let kind = if quote == b'\'' {
                ValueKind::SingleQuoted
            } else {
                ValueKind::DoubleQuoted
            };
            Some((
                RawValue {
                    kind,
                    start: start + 1,
                    len: i - (start + 1),
                },
                i + 1,
            ))
        }
        b'{' if b.get(start + 1) == Some(&b'{') => {
            // shortest run to `}}`; the expression form cannot span lines
            let mut i = start + 2;
            while i < b.len() {
                if at(b, i, b"}}") {
                    return Some((
                        RawValue {
                            kind: ValueKind::Expression,
                            start: start + 2,
                            len: i - (start + 2),
                        },
                        i + 2,
                    ));
                }
                if b[i] == b'\n' || b[i] == b'\r' {
                    return None;
                }
                i += 1;
            }
            None
        }
        _ => None,
    }
}

/// A matched closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClosingTag {
    /// Total match length, `<` through `>`.
    pub len: usize,
    /// Tag name length; the name starts at offset 2.
    pub name_len: usize,
    /// True when a `--` was fused between the name and `>` (`</div-->`).
    pub fused_comment_closer: bool,
}

/// Match a closing tag: `</` name (`--`)? `>`. The name is word-character
/// segments joined by single hyphens; a hyphen not followed by a word
/// character is left for the fused comment-closer check.
pub(crate) fn match_closing_tag(suffix: &str) -> Option<ClosingTag> {
    let b = suffix.as_bytes();
    if !at(b, 0, b"</") {
        return None;
    }
    let mut i = 2;
    let first_segment = i;
    while i < b.len() && is_word_byte(b[i]) {
        i += 1;
    }
    if i == first_segment {
        return None;
    }
    while i < b.len() && b[i] == b'-' && i + 1 < b.len() && is_word_byte(b[i + 1]) {
        i += 1;
        while i < b.len() && is_word_byte(b[i]) {
            i += 1;
        }
    }
    let name_len = i - 2;

    let mut fused = false;
    if at(b, i, b"--") && b.get(i + 2) == Some(&b'>') {
        fused = true;
        i += 2;
    }
    if b.get(i) == Some(&b'>') {
        Some(ClosingTag {
            len: i + 1,
            name_len,
            fused_comment_closer: fused,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Skip categories ─────────────────────────────────────────────────

    #[test]
    fn directive_basic() {
        assert_eq!(match_directive("<!DOCTYPE html>rest"), Some(15));
    }

    #[test]
    fn directive_requires_whitespace_after_word() {
        assert_eq!(match_directive("<!DOCTYPE>"), None);
        // a comment opener is not a directive: '-' is not a word character
        assert_eq!(match_directive("<!-- c -->"), None);
    }

    #[test]
    fn directive_unterminated() {
        assert_eq!(match_directive("<!DOCTYPE html"), None);
    }

    #[test]
    fn comment_complete() {
        assert_eq!(scan_comment("<!-- hi -->after"), CommentScan::Complete { len: 11 });
        assert_eq!(scan_comment("<!---->"), CommentScan::Complete { len: 7 });
    }

    #[test]
    fn comment_spans_lines() {
        assert_eq!(scan_comment("<!-- a\nb -->"), CommentScan::Complete { len: 12 });
    }

    #[test]
    fn comment_unterminated() {
        assert_eq!(scan_comment("<!-- never closed"), CommentScan::Unterminated);
        assert_eq!(scan_comment("<!--"), CommentScan::Unterminated);
    }

    #[test]
    fn comment_nested_opener_with_later_closer() {
        assert_eq!(
            scan_comment("<!-- <!-- -->"),
            CommentScan::NestedOpener { opener_offset: 5 }
        );
    }

    #[test]
    fn comment_nested_opener_without_closer_is_unterminated() {
        assert_eq!(scan_comment("<!-- <!-- xyz"), CommentScan::Unterminated);
    }

    #[test]
    fn comment_not_comment() {
        assert_eq!(scan_comment("<div>"), CommentScan::NotComment);
    }

    #[test]
    fn interpolation_basic() {
        assert_eq!(match_interpolation("{{user.name}} tail"), Some(13));
        assert_eq!(match_interpolation("{{}}"), Some(4));
        assert_eq!(match_interpolation("{{a\nb}}"), Some(7));
    }

    #[test]
    fn interpolation_unterminated() {
        assert_eq!(match_interpolation("{{oops"), None);
        assert_eq!(match_interpolation("{x}"), None);
    }

    #[test]
    fn text_run_stops_at_boundaries() {
        assert_eq!(match_text_run("hello<div>"), Some(5));
        assert_eq!(match_text_run("a{{b}}"), Some(1));
        assert_eq!(match_text_run("ab-->c"), Some(2));
        // lone '{' and lone '-' are plain text
        assert_eq!(match_text_run("a{b-c"), Some(5));
    }

    #[test]
    fn text_run_empty_at_boundary() {
        assert_eq!(match_text_run("<div>"), None);
        assert_eq!(match_text_run("{{x}}"), None);
        assert_eq!(match_text_run("-->"), None);
    }

    // ── Opening tags ────────────────────────────────────────────────────

    #[test]
    fn opening_tag_no_attributes() {
        let tag = match_opening_tag("<div>").unwrap();
        assert_eq!(tag.len, 5);
        assert_eq!(tag.name_len, 3);
        assert!(tag.attributes.is_empty());
        assert!(tag.slash_offset.is_none());
    }

    #[test]
    fn opening_tag_attribute_value_forms() {
        let tag = match_opening_tag(r#"<a x='1' y="2" z={{v}} w>"#).unwrap();
        assert_eq!(tag.attributes.len(), 4);
        assert_eq!(tag.attributes[0].value.unwrap().kind, ValueKind::SingleQuoted);
        assert_eq!(tag.attributes[1].value.unwrap().kind, ValueKind::DoubleQuoted);
        assert_eq!(tag.attributes[2].value.unwrap().kind, ValueKind::Expression);
        assert!(tag.attributes[3].value.is_none());
    }

    #[test]
    fn opening_tag_value_interiors() {
        let src = r#"<a href="x>y">"#;
        let tag = match_opening_tag(src).unwrap();
        let v = tag.attributes[0].value.unwrap();
        assert_eq!(&src[v.start..v.start + v.len], "x>y");
    }

    #[test]
    fn opening_tag_self_closing_slash() {
        let tag = match_opening_tag("<br/>").unwrap();
        assert_eq!(tag.slash_offset, Some(3));
        let tag = match_opening_tag("<br / >").unwrap();
        assert_eq!(tag.slash_offset, Some(4));
    }

    #[test]
    fn opening_tag_bare_equals_fails_whole_tag() {
        assert_eq!(match_opening_tag("<div foo=>"), None);
        assert_eq!(match_opening_tag("<div foo='unterminated>"), None);
    }

    #[test]
    fn opening_tag_expression_value_cannot_span_lines() {
        assert_eq!(match_opening_tag("<a x={{1\n2}}>"), None);
        // quoted values can
        assert!(match_opening_tag("<a x='1\n2'>").is_some());
    }

    #[test]
    fn opening_tag_rejects_non_tags() {
        assert_eq!(match_opening_tag("</div>"), None);
        assert_eq!(match_opening_tag("<!DOCTYPE html>"), None);
        assert_eq!(match_opening_tag("< div>"), None);
    }

    // ── Closing tags ────────────────────────────────────────────────────

    #[test]
    fn closing_tag_basic() {
        let tag = match_closing_tag("</div>").unwrap();
        assert_eq!(tag.len, 6);
        assert_eq!(tag.name_len, 3);
        assert!(!tag.fused_comment_closer);
    }

    #[test]
    fn closing_tag_hyphenated_name() {
        let tag = match_closing_tag("</my-widget>").unwrap();
        assert_eq!(tag.name_len, 9);
        assert!(!tag.fused_comment_closer);
    }

    #[test]
    fn closing_tag_fused_comment_closer() {
        let tag = match_closing_tag("</div-->").unwrap();
        assert_eq!(tag.len, 8);
        assert_eq!(tag.name_len, 3);
        assert!(tag.fused_comment_closer);
    }

    #[test]
    fn closing_tag_rejects_malformed() {
        assert_eq!(match_closing_tag("</ div>"), None);
        assert_eq!(match_closing_tag("</div--->"), None);
        assert_eq!(match_closing_tag("<div>"), None);
    }
}
