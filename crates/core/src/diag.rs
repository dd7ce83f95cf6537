//! Re-exports from the diagnostics crate.
//!
//! Internal modules and downstream crates can use `tplint_core::diag`
//! without depending on `tplint_diagnostics` directly.

pub use tplint_diagnostics::{Diagnostic, LineIndex, Severity, Span, codes, explain};
