//! tplint core library.
//!
//! Static validation of HTML-like component template markup.  A single pass
//! over the template text enforces structural well-formedness (tag balance,
//! comment syntax), checks naming conventions for ids and CSS classes, and
//! cross-references id/class usage against two auxiliary source blobs to
//! flag dead or undeclared references.  The main entry points are
//! [`validate_str`] and [`validate_with_options`].

#![warn(missing_docs)]

/// Re-exports from the diagnostics crate.
pub mod diag;
/// Validation options: the auxiliary source blobs.
pub mod options;
/// Template scanner: lexical dispatch, tag analysis, tag balance.
pub mod scan;
/// Id/class usage cross-referencing against auxiliary sources.
pub mod usage;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Validator
pub use scan::{UnrecognizedSyntax, ValidationResult, validate_str, validate_with_options};

// Options
pub use options::ValidateOptions;

// Usage maps
pub use usage::{UsageMap, UsageOrigin};

// Diagnostics (re-exported from the diagnostics crate)
pub use diag::{Diagnostic, Severity, Span, codes};
