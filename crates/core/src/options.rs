use serde::{Deserialize, Serialize};

/// Auxiliary source blobs consulted by the usage cross-referencer.
///
/// Both fields default to empty.  The blobs are pattern-matched for literal
/// id/class references only — never executed or compiled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidateOptions {
    /// Component-scoped controller source text.
    pub controller_source: String,
    /// Globally-available ("ambient") script source text.
    pub ambient_source: String,
}
