//! Version name/id/code resolution shared by all three decoders.
//!
//! Resolution order for the display code: explicit source metadata, then the
//! known-code dictionary matched against the filename (longest code first),
//! then a short filename verbatim, then the first three characters of the
//! resolved name.

use crate::consts;

/// Stem length at or below which the filename itself is plausible as a
/// display code ("kjv.xml", "asv1901.json").
const SHORT_STEM_LEN: usize = 8;

/// Strip directories and every extension from a filename hint.
pub(crate) fn stem(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.split('.').next().unwrap_or(name)
}

/// Derive a human-readable version name from a filename: underscores and
/// hyphens become spaces.
pub(crate) fn name_from_filename(filename: &str) -> String {
    stem(filename).replace(['_', '-'], " ").trim().to_string()
}

/// Resolve the short display code for a version.
pub(crate) fn resolve_code(explicit: Option<&str>, filename: Option<&str>, name: &str) -> String {
    if let Some(code) = explicit.map(str::trim).filter(|code| !code.is_empty()) {
        return code.to_string();
    }
    if let Some(filename) = filename {
        if let Some(code) = consts::longest_code_in(filename) {
            return code.to_string();
        }
        let stem = stem(filename);
        if !stem.is_empty() && stem.len() <= SHORT_STEM_LEN {
            return stem.to_uppercase();
        }
    }
    name.chars().take(3).collect::<String>().to_uppercase()
}
