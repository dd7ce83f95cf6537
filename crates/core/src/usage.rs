//! Id/class usage cross-referencing.
//!
//! Before the markup scan begins, the two auxiliary source blobs are scanned
//! once for literal id/class references. The resulting maps answer "is this
//! name referenced anywhere, and by whom" for the unused/undeclared checks.
//! The blobs are pattern-matched only — never executed or compiled.

use std::collections::HashMap;

use crate::options::ValidateOptions;
use crate::scan::matchers::{is_name_byte, is_word_byte};

/// Why an id or class is considered "used".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOrigin {
    /// Referenced by the component's controller source.
    Controller,
    /// Referenced by globally-available ("ambient") script source.
    Ambient,
    /// Referenced by a `<label for="…">` attribute in the template itself.
    Label,
}

/// Maps from id/class name to the origin that referenced it.
///
/// Absence of an entry is the "unknown" state that feeds the unused checks.
#[derive(Debug, Default)]
pub struct UsageMap {
    ids: HashMap<String, UsageOrigin>,
    classes: HashMap<String, UsageOrigin>,
}

impl UsageMap {
    /// Pre-scan the auxiliary sources for literal id/class references.
    ///
    /// The controller pass runs first and the ambient pass second, and every
    /// match overwrites: a name referenced in both blobs ends up recorded as
    /// `Ambient`, never `Controller`. Last pass wins.
    pub fn build(options: &ValidateOptions) -> Self {
        let mut map = UsageMap::default();

        scan_selectors(&options.controller_source, b'#', |id| {
            map.ids.insert(id, UsageOrigin::Controller);
        });
        scan_call_arguments(&options.controller_source, "getElementById(", |id| {
            map.ids.insert(id, UsageOrigin::Controller);
        });
        scan_selectors(&options.ambient_source, b'#', |id| {
            map.ids.insert(id, UsageOrigin::Ambient);
        });
        scan_call_arguments(&options.ambient_source, "getElementById(", |id| {
            map.ids.insert(id, UsageOrigin::Ambient);
        });
        scan_call_arguments(&options.ambient_source, "by.id(", |id| {
            map.ids.insert(id, UsageOrigin::Ambient);
        });

        scan_selectors(&options.controller_source, b'.', |class| {
            map.classes.insert(class, UsageOrigin::Controller);
        });
        scan_selectors(&options.ambient_source, b'.', |class| {
            map.classes.insert(class, UsageOrigin::Ambient);
        });

        map
    }

    /// The origin that referenced this id, if any.
    pub fn id_origin(&self, id: &str) -> Option<UsageOrigin> {
        self.ids.get(id).copied()
    }

    /// The origin that referenced this class, if any.
    pub fn class_origin(&self, class: &str) -> Option<UsageOrigin> {
        self.classes.get(class).copied()
    }

    /// Record a `<label for="…">` reference found during the markup scan.
    pub(crate) fn mark_label_target(&mut self, id: &str) {
        self.ids.insert(id.to_string(), UsageOrigin::Label);
    }
}

/// Find every `<sigil>name` occurrence (CSS-style `#id` / `.class` literals)
/// and call `found` with the captured name.
fn scan_selectors(source: &str, sigil: u8, mut found: impl FnMut(String)) {
    let b = source.as_bytes();
    let mut i = 0;
    while i < b.len() {
        if b[i] == sigil {
            let start = i + 1;
            let mut j = start;
            while j < b.len() && is_name_byte(b[j]) {
                j += 1;
            }
            if j > start {
                found(source[start..j].to_string());
                i = j;
                continue;
            }
        }
        i += 1;
    }
}

/// Find every word-bounded `callee` followed by a quoted name — the
/// DOM-lookup patterns `getElementById('x` / `by.id("x` — and call `found`
/// with the captured name. Only the opening quote matters; the name is the
/// run of word/hyphen characters right after it.
fn scan_call_arguments(source: &str, callee: &str, mut found: impl FnMut(String)) {
    let b = source.as_bytes();
    for (at, _) in source.match_indices(callee) {
        if at > 0 && is_word_byte(b[at - 1]) {
            continue;
        }
        let mut j = at + callee.len();
        if j >= b.len() || (b[j] != b'\'' && b[j] != b'"') {
            continue;
        }
        j += 1;
        let start = j;
        while j < b.len() && is_name_byte(b[j]) {
            j += 1;
        }
        if j > start {
            found(source[start..j].to_string());
        }
    }
}
