use super::slugify;
use serde::{Deserialize, Serialize};
use time::UtcDateTime;

/// One imported Bible translation. This is the unit of replacement in the
/// corpus store: re-importing the same `id` fully replaces its books and
/// verses, never merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Derived from `name` (lowercased, spaces to hyphens) unless the source
    /// supplies one explicitly.
    pub id: String,
    /// Human-readable translation name, e.g. "New King James Version".
    pub name: String,
    /// Short display token, e.g. "NKJV".
    pub code: String,
    pub last_updated: UtcDateTime,
    /// Size of the decoded source document in bytes.
    pub size_bytes: u64,
}

impl Version {
    /// Build a version record, deriving `id` from `name` when the source
    /// didn't provide one.
    pub fn new(id: Option<String>, name: impl Into<String>, code: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let id = id.filter(|id| !id.trim().is_empty()).unwrap_or_else(|| slugify(&name));
        Self { id, name, code: code.into(), last_updated: UtcDateTime::now(), size_bytes }
    }
}

impl AsRef<Version> for Version {
    fn as_ref(&self) -> &Version {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_derived_from_name() {
        let version = Version::new(None, "New King James Version", "NKJV", 0);
        assert_eq!(version.id, "new-king-james-version");
    }

    #[test]
    fn test_explicit_id_wins() {
        let version = Version::new(Some("nkjv".into()), "New King James Version", "NKJV", 0);
        assert_eq!(version.id, "nkjv");
    }

    #[test]
    fn test_blank_explicit_id_falls_back() {
        let version = Version::new(Some("  ".into()), "World English Bible", "WEB", 0);
        assert_eq!(version.id, "world-english-bible");
    }

    #[test]
    fn test_serde_roundtrip_includes_timestamp() {
        let version = Version::new(None, "King James Version", "KJV", 42);
        let json = serde_json::to_string(&version).unwrap();
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, version);
    }
}
