//! Diagnostics for the tplint toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], [`Span`], and [`LineIndex`] types
//! used to report findings from the template scanner and validator.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants auto-generated from the spec.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// ── LineIndex ────────────────────────────────────────────────────────────

/// Maps byte offsets in a source string to line and column positions.
///
/// Lines and columns are **0-indexed** internally. Use [`LineIndex::line_col`]
/// to get a `(line, col)` pair and add 1 when displaying to users.
///
/// The index is built in O(n) time and each lookup is O(log n) via binary
/// search. This struct is intentionally dependency-free so it can be reused
/// by an editor integration or any other consumer.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a `LineIndex` from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 0-indexed `(line, column)` pair.
    ///
    /// If `offset` is past the end of the source, the last line is returned
    /// with the column clamped to the line length.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line, col)
    }

    /// Byte offset of the start of the given 0-indexed line.
    ///
    /// Returns `None` if `line` is out of bounds.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Total number of lines (at least 1 for non-empty or even empty input).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error — the input is invalid.
    Error,
    /// Warning — the input may produce unexpected results.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the source input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A diagnostic message produced by the template scanner or validator.
///
/// `line` and `column` are **1-based** and are derived from the finding's
/// absolute byte offset at creation time, so every diagnostic is
/// self-describing even without the source text at hand. The raw byte
/// offset is carried in `span` for consumers that annotate source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"TPL1303"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Name of the file the finding belongs to. A label only — never
    /// interpreted as a path.
    pub file: String,
    /// 1-based line number of the finding.
    pub line: u32,
    /// 1-based column number of the finding.
    pub column: u32,
    /// Optional advice, e.g. a suggested replacement or a pointer to a
    /// related source position. Serialized only when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Optional byte span in the source input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            file: file.into(),
            line,
            column,
            hint: None,
            span: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self::new(id, Severity::Error, message, file, line, column)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self::new(id, Severity::Warn, message, file, line, column)
    }

    /// Attach a hint (builder pattern).
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach a source span (builder pattern).
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({}:{}:{})",
            self.severity, self.id, self.message, self.file, self.line, self.column
        )
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
///
/// Auto-generated from `spec/diagnostics.json` at build time.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── LineIndex ────────────────────────────────────────────────────────

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(4), (0, 4));
    }

    #[test]
    fn line_index_two_lines() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_col(0), (0, 0)); // 'a'
        assert_eq!(idx.line_col(1), (0, 1)); // 'b'
        assert_eq!(idx.line_col(2), (0, 2)); // '\n'
        assert_eq!(idx.line_col(3), (1, 0)); // 'c'
        assert_eq!(idx.line_col(4), (1, 1)); // 'd'
    }

    #[test]
    fn line_index_trailing_newline() {
        let idx = LineIndex::new("a\n");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(2), (1, 0)); // start of (empty) second line
    }

    #[test]
    fn line_index_empty_input() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_col(0), (0, 0));
    }

    #[test]
    fn line_index_multiple_newlines() {
        let idx = LineIndex::new("a\n\nb\n");
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.line_col(0), (0, 0)); // 'a'
        assert_eq!(idx.line_col(2), (1, 0)); // empty line
        assert_eq!(idx.line_col(3), (2, 0)); // 'b'
        assert_eq!(idx.line_col(5), (3, 0)); // empty trailing line
    }

    #[test]
    fn line_index_multibyte_utf8() {
        // '€' is 3 bytes in UTF-8
        let idx = LineIndex::new("€\na");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_col(0), (0, 0)); // start of '€'
        assert_eq!(idx.line_col(3), (0, 3)); // '\n' (byte offset 3)
        assert_eq!(idx.line_col(4), (1, 0)); // 'a'
    }

    #[test]
    fn line_index_offset_past_end() {
        let idx = LineIndex::new("hi");
        // offset past the end should clamp to last line
        let (line, col) = idx.line_col(100);
        assert_eq!(line, 0);
        assert_eq!(col, 100);
    }

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_new_valid() {
        let s = Span::new(5, 10);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 10);
    }

    #[test]
    fn span_empty() {
        let s = Span::empty(7);
        assert_eq!(s.start, 7);
        assert_eq!(s.end, 7);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    // ── Severity Display ────────────────────────────────────────────────

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    // ── Diagnostic constructors ─────────────────────────────────────────

    #[test]
    fn diagnostic_error_constructor() {
        let d = Diagnostic::error(codes::TAG_MISMATCHED_CLOSING, "bad nesting", "a.tpl", 3, 7);
        assert_eq!(d.id, "TPL1303");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "bad nesting");
        assert_eq!(d.file, "a.tpl");
        assert_eq!((d.line, d.column), (3, 7));
        assert!(d.hint.is_none());
        assert!(d.span.is_none());
    }

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::ID_UNUSED, "unused id 'x'", "a.tpl", 1, 1);
        assert_eq!(d.id, "TPL2102");
        assert_eq!(d.severity, Severity::Warn);
    }

    #[test]
    fn diagnostic_builders() {
        let d = Diagnostic::error(codes::ID_DUPLICATE, "duplicate id 'x'", "a.tpl", 2, 6)
            .with_hint("first occurrence at line 1, column 6")
            .with_span(Span::empty(42));
        assert_eq!(d.hint.as_deref(), Some("first occurrence at line 1, column 6"));
        assert_eq!(d.span, Some(Span::empty(42)));
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::TAG_UNEXPECTED_CLOSING, "got </b> without <b>", "t", 2, 3);
        assert_eq!(format!("{d}"), "error[TPL1302]: got </b> without <b> (t:2:3)");
    }

    // ── Explanations ────────────────────────────────────────────────────

    #[test]
    fn explain_known_code() {
        assert!(explain(codes::NAMING_CONVENTION).is_some());
        assert!(explain(codes::SCAN_COMMENT_NESTED_OPENER).is_some());
    }

    #[test]
    fn explain_unknown_code() {
        assert!(explain("TPL9999").is_none());
    }

    // ── Serialization ───────────────────────────────────────────────────

    #[test]
    fn diagnostic_json_skips_absent_optionals() {
        let d = Diagnostic::warn(codes::CLASS_UNUSED, "unused class 'x'", "a.tpl", 1, 12);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("hint"));
        assert!(!json.contains("span"));

        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn diagnostic_json_roundtrip_with_hint_and_span() {
        let d = Diagnostic::warn(codes::NAMING_CONVENTION, "class 'FooBar'", "a.tpl", 4, 9)
            .with_hint("suggest writing it as 'foo-bar' instead")
            .with_span(Span::new(30, 36));
        let json = serde_json::to_string(&d).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
