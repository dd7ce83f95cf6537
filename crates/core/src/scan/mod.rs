//! Template scanner: single-pass lexical dispatch and validation.
//!
//! At each cursor position the remaining input is classified against the
//! lexical categories in strict priority order: skip categories (directive,
//! well-formed comment, interpolation), text runs, opening tags, closing
//! tags, then the terminal comment-error categories. Anything else is an
//! unrecognized-syntax fatal error that discards all findings for the call.

mod balance;
pub(crate) mod matchers;
mod naming;

use std::collections::HashMap;

use crate::diag::{Diagnostic, LineIndex, Severity, Span, codes};
use crate::options::ValidateOptions;
use crate::usage::{UsageMap, UsageOrigin};
use self::balance::{CloseOutcome, TagStack};
use self::matchers::{CommentScan, OpeningTag, RawAttribute, ValueKind};

/// Element types that cannot have a closing tag or children.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "input", "img", "link", "meta"];

/// Number of characters of unconsumed input quoted in a fatal error.
const FATAL_SNIPPET_CHARS: usize = 15;

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Result of validating a template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationResult {
    /// `true` if no errors were found (warnings and info are allowed).
    pub ok: bool,
    /// All diagnostics produced, sorted by (line, column) ascending.
    pub issues: Vec<Diagnostic>,
}

/// Fatal failure: the scanner reached input it cannot classify.
///
/// Distinct from the diagnostics channel. A fatal failure discards all
/// diagnostics accumulated for the call — callers must treat it as "this
/// file could not be validated", not as "this file has zero issues".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized syntax \"{snippet}\" at line {line}, column {column} of {file}")]
pub struct UnrecognizedSyntax {
    /// First characters of unconsumed input, newlines rendered as `\n`/`\r`.
    pub snippet: String,
    /// File-name label of the template.
    pub file: String,
    /// 1-based line of the unconsumed input.
    pub line: u32,
    /// 1-based column of the unconsumed input.
    pub column: u32,
}

/// Validate a template with no auxiliary sources.
pub fn validate_str(content: &str, file: &str) -> Result<ValidationResult, UnrecognizedSyntax> {
    validate_with_options(content, file, &ValidateOptions::default())
}

/// Validate a template, cross-referencing id/class usage against the
/// auxiliary sources carried in `options`.
pub fn validate_with_options(
    content: &str,
    file: &str,
    options: &ValidateOptions,
) -> Result<ValidationResult, UnrecognizedSyntax> {
    Scanner::new(content, file, UsageMap::build(options)).run()
}

// ─── Scanner Implementation ─────────────────────────────────────────────────

/// First-occurrence position of an id or class, for duplicate hints.
struct SourcePos {
    line: u32,
    column: u32,
}

/// An id whose usage could not be decided at first sight — a later
/// `<label for="…">` may still reference it.
struct DeferredId {
    id: String,
    offset: usize,
}

struct Scanner<'a> {
    content: &'a str,
    file: &'a str,
    index: LineIndex,
    usage: UsageMap,
    pos: usize,
    stack: TagStack,
    seen_ids: HashMap<String, SourcePos>,
    seen_classes: HashMap<String, SourcePos>,
    deferred_ids: Vec<DeferredId>,
    issues: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    fn new(content: &'a str, file: &'a str, usage: UsageMap) -> Self {
        Self {
            content,
            file,
            index: LineIndex::new(content),
            usage,
            pos: 0,
            stack: TagStack::default(),
            seen_ids: HashMap::new(),
            seen_classes: HashMap::new(),
            deferred_ids: Vec::new(),
            issues: Vec::new(),
        }
    }

    // ── Position helpers ────────────────────────────────────────────────

    /// 1-based (line, column) of a byte offset.
    fn position(&self, offset: usize) -> (u32, u32) {
        let (line, col) = self.index.line_col(offset);
        (line as u32 + 1, col as u32 + 1)
    }

    /// Build a diagnostic anchored at `offset`.
    fn diag(
        &self,
        id: &'static str,
        severity: Severity,
        message: impl Into<String>,
        offset: usize,
    ) -> Diagnostic {
        let (line, column) = self.position(offset);
        Diagnostic::new(id, severity, message, self.file, line, column)
            .with_span(Span::empty(offset))
    }

    // ── Main scan loop ──────────────────────────────────────────────────

    fn run(mut self) -> Result<ValidationResult, UnrecognizedSyntax> {
        let content = self.content;
        while self.pos < content.len() {
            let suffix = &content[self.pos..];

            // Skip categories: consumed silently.
            if let Some(len) = matchers::match_directive(suffix) {
                self.pos += len;
                continue;
            }
            let comment = matchers::scan_comment(suffix);
            if let CommentScan::Complete { len } = comment {
                self.pos += len;
                continue;
            }
            if let Some(len) = matchers::match_interpolation(suffix) {
                self.pos += len;
                continue;
            }

            if let Some(len) = matchers::match_text_run(suffix) {
                self.check_text(self.pos, len);
                self.pos += len;
                continue;
            }

            if let Some(tag) = matchers::match_opening_tag(suffix) {
                self.analyze_opening_tag(&tag);
                self.pos += tag.len;
                continue;
            }

            if let Some(tag) = matchers::match_closing_tag(suffix) {
                let name = &content[self.pos + 2..self.pos + 2 + tag.name_len];
                if tag.fused_comment_closer {
                    let closer = self.pos + tag.len - 3;
                    let d = self.diag(
                        codes::SCAN_CLOSER_IN_CLOSING_TAG,
                        Severity::Error,
                        format!("mismatched HTML comment closer in closing tag ('</{name} -->')"),
                        closer,
                    );
                    self.issues.push(d);
                    return Ok(self.into_result());
                }
                self.balance_closing_tag(name);
                self.pos += tag.len;
                continue;
            }

            // Terminal comment-error categories: one diagnostic, then return
            // what has been collected so far. No stack draining, no deferred
            // id resolution — comment syntax is broken, further structural
            // analysis is unreliable.
            match comment {
                CommentScan::Unterminated => {
                    let d = self.diag(
                        codes::SCAN_COMMENT_UNTERMINATED,
                        Severity::Error,
                        "mismatched HTML comment opener ('<!--')",
                        self.pos,
                    );
                    self.issues.push(d);
                    return Ok(self.into_result());
                }
                CommentScan::NestedOpener { opener_offset } => {
                    let d = self.diag(
                        codes::SCAN_COMMENT_NESTED_OPENER,
                        Severity::Error,
                        "HTML comment opener ('<!--') inside HTML comment",
                        self.pos + opener_offset,
                    );
                    self.issues.push(d);
                    return Ok(self.into_result());
                }
                CommentScan::NotComment | CommentScan::Complete { .. } => {}
            }
            if suffix.starts_with("-->") {
                let d = self.diag(
                    codes::SCAN_COMMENT_STRAY_CLOSER,
                    Severity::Error,
                    "mismatched HTML comment closer ('-->')",
                    self.pos,
                );
                self.issues.push(d);
                return Ok(self.into_result());
            }

            return Err(self.unrecognized_syntax());
        }

        // End of document: every still-open element is reported, then the
        // deferred id checks are resolved against the final usage map.
        for frame in self.stack.drain_unclosed() {
            let d = self
                .diag(
                    codes::TAG_UNCLOSED_AT_EOF,
                    Severity::Error,
                    format!("got end of template before the expected </{}>", frame.name),
                    self.content.len(),
                )
                .with_hint(format!(
                    "mismatched opening <{}> at line {}, column {}",
                    frame.name, frame.line, frame.column
                ));
            self.issues.push(d);
        }

        let deferred = std::mem::take(&mut self.deferred_ids);
        for DeferredId { id, offset } in deferred {
            if self.usage.id_origin(&id).is_none() {
                let d = self.diag(
                    codes::ID_UNUSED,
                    Severity::Warn,
                    format!("unused id '{id}'"),
                    offset,
                );
                self.issues.push(d);
            }
        }

        Ok(self.into_result())
    }

    /// Sort and wrap the collected diagnostics.
    fn into_result(mut self) -> ValidationResult {
        // single stable sort on the (line, column) tuple; diagnostics with
        // equal positions keep their emission order
        self.issues.sort_by_key(|d| (d.line, d.column));
        let ok = !self
            .issues
            .iter()
            .any(|d| matches!(d.severity, Severity::Error));
        ValidationResult {
            ok,
            issues: self.issues,
        }
    }

    fn unrecognized_syntax(&self) -> UnrecognizedSyntax {
        let snippet: String = self.content[self.pos..]
            .chars()
            .take(FATAL_SNIPPET_CHARS)
            .collect();
        let snippet = snippet.replace('\n', "\\n").replace('\r', "\\r");
        let (line, column) = self.position(self.pos);
        UnrecognizedSyntax {
            snippet,
            file: self.file.to_string(),
            line,
            column,
        }
    }

    // ── Text runs ───────────────────────────────────────────────────────

    /// Report every `&` in the run that is not part of `&amp;`.
    fn check_text(&mut self, start: usize, len: usize) {
        let content = self.content;
        let text = &content[start..start + len];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'&' && !text[i..].starts_with("&amp;") {
                let d = self
                    .diag(
                        codes::TEXT_BARE_AMPERSAND,
                        Severity::Warn,
                        "got bare ampersand ('&') in text",
                        start + i,
                    )
                    .with_hint("escape ampersands as '&amp;'");
                self.issues.push(d);
            }
        }
    }

    // ── Opening tags ────────────────────────────────────────────────────

    fn analyze_opening_tag(&mut self, tag: &OpeningTag) {
        let content = self.content;
        let start = self.pos;
        let name = &content[start + 1..start + 1 + tag.name_len];

        if !is_void(name) {
            let (line, column) = self.position(start);
            self.stack.push(name, line, column);
        }

        for attr in &tag.attributes {
            self.analyze_attribute(name, start, attr);
        }

        if let Some(slash) = tag.slash_offset {
            let d = self
                .diag(
                    codes::TAG_SELF_CLOSING_SLASH,
                    Severity::Warn,
                    format!("XHTML-style self-closing slash at the end of <{name}> tag"),
                    start + slash,
                )
                .with_hint("the slash has no effect here; non-void elements still need an explicit closing tag");
            self.issues.push(d);
        }
    }

    fn analyze_attribute(&mut self, tag_name: &str, tag_start: usize, attr: &RawAttribute) {
        let content = self.content;
        let attr_pos = tag_start + attr.name_start;
        let attr_name = &content[attr_pos..attr_pos + attr.name_len];

        if let Some(value) = &attr.value
            && value.kind == ValueKind::Expression
        {
            let expr = &content[tag_start + value.start..tag_start + value.start + value.len];
            let d = self.diag(
                codes::ATTR_UNQUOTED_EXPRESSION,
                Severity::Warn,
                format!("unquoted template expression in attribute value: {{{{{expr}}}}}"),
                attr_pos + attr.name_len + 1,
            );
            self.issues.push(d);
            return;
        }

        let value = attr
            .value
            .as_ref()
            .map(|v| &content[tag_start + v.start..tag_start + v.start + v.len])
            .unwrap_or("");

        if attr_name == "id" {
            self.check_id(value, attr_pos);
        } else if tag_name == "label" && attr_name == "for" {
            // satisfies the unused-id check for the referenced id
            self.usage.mark_label_target(value);
        } else if attr_name == "class" && !value.contains("{{") {
            self.check_classes(value, attr_pos);
        }
    }

    fn check_id(&mut self, id: &str, attr_pos: usize) {
        if let Some(first) = self.seen_ids.get(id) {
            let hint = format!(
                "first occurrence at line {}, column {}",
                first.line, first.column
            );
            let d = self
                .diag(
                    codes::ID_DUPLICATE,
                    Severity::Error,
                    format!("duplicate id '{id}'"),
                    attr_pos,
                )
                .with_hint(hint);
            self.issues.push(d);
            return;
        }

        let (line, column) = self.position(attr_pos);
        self.seen_ids.insert(id.to_string(), SourcePos { line, column });
        if self.usage.id_origin(id).is_none() {
            // a later <label for="…"> may still reference this id;
            // decided after the full scan
            self.deferred_ids.push(DeferredId {
                id: id.to_string(),
                offset: attr_pos,
            });
        }
        if self.usage.id_origin(id) != Some(UsageOrigin::Ambient) {
            self.check_naming(id, "id", attr_pos);
        }
    }

    fn check_classes(&mut self, value: &str, attr_pos: usize) {
        for token in value.split_whitespace() {
            if self.seen_classes.contains_key(token) {
                continue;
            }
            let (line, column) = self.position(attr_pos);
            self.seen_classes
                .insert(token.to_string(), SourcePos { line, column });
            if self.usage.class_origin(token).is_none() {
                let d = self.diag(
                    codes::CLASS_UNUSED,
                    Severity::Warn,
                    format!("unused class '{token}'"),
                    attr_pos,
                );
                self.issues.push(d);
            }
            if self.usage.class_origin(token) != Some(UsageOrigin::Ambient) {
                self.check_naming(token, "class", attr_pos);
            }
        }
    }

    fn check_naming(&mut self, name: &str, kind: &str, offset: usize) {
        if naming::is_conventional(name) {
            return;
        }
        let suggested = naming::suggest(name);
        let d = self
            .diag(
                codes::NAMING_CONVENTION,
                Severity::Warn,
                format!("{kind} '{name}' does not follow the naming convention (all-lowercase, hyphen-separated)"),
                offset,
            )
            .with_hint(format!("suggest writing it as '{suggested}' instead"));
        self.issues.push(d);
    }

    // ── Closing tags ────────────────────────────────────────────────────

    fn balance_closing_tag(&mut self, name: &str) {
        match self.stack.close(name) {
            CloseOutcome::Matched => {}
            CloseOutcome::Empty => {
                let d = self.diag(
                    codes::TAG_UNEXPECTED_CLOSING,
                    Severity::Error,
                    format!("got </{name}> without <{name}>"),
                    self.pos,
                );
                self.issues.push(d);
            }
            CloseOutcome::Recovered { discarded, matched } => {
                for frame in &discarded {
                    let d = self
                        .diag(
                            codes::TAG_MISMATCHED_CLOSING,
                            Severity::Error,
                            format!("got </{name}> before the expected </{}>", frame.name),
                            self.pos,
                        )
                        .with_hint(format!(
                            "mismatched opening <{}> at line {}, column {}",
                            frame.name, frame.line, frame.column
                        ));
                    self.issues.push(d);
                }
                if !matched {
                    let d = self.diag(
                        codes::TAG_UNEXPECTED_CLOSING,
                        Severity::Error,
                        format!("got </{name}> without <{name}>"),
                        self.pos,
                    );
                    self.issues.push(d);
                }
            }
        }
    }
}
