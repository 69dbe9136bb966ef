use serde::{Deserialize, Serialize};

/// A book within one imported version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Composite primary key: `version|bookId`.
    pub key: String,
    /// The owning version id.
    pub version: String,
    /// Derived from `name`: lowercased, spaces removed, truncated to 8 chars.
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    /// Highest chapter number observed while decoding. Always >= the chapter
    /// of every verse decoded for this book.
    pub chapter_count: u32,
}

impl Book {
    pub fn new(version: impl Into<String>, name: impl Into<String>, chapter_count: u32) -> Self {
        let version = version.into();
        let name = name.into();
        let id = Self::id_from_name(&name);
        let abbreviation = Self::abbreviate(&name);
        let key = format!("{version}|{id}");
        Self { key, version, id, name, abbreviation, chapter_count }
    }

    /// Lowercase, strip spaces, truncate to 8 characters.
    pub fn id_from_name(name: &str) -> String {
        name.to_lowercase().split_whitespace().collect::<String>().chars().take(8).collect()
    }

    // "1 John" -> "1Jn" style abbreviations are dialect-specific; the
    // generic fallback is the first three non-space characters.
    fn abbreviate(name: &str) -> String {
        name.split_whitespace().collect::<String>().chars().take(3).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Genesis", "genesis")]
    #[case("Song of Solomon", "songofso")]
    #[case("1 John", "1john")]
    #[case("Revelation", "revelati")]
    fn test_id_from_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(Book::id_from_name(name), expected);
    }

    #[test]
    fn test_key_is_version_scoped() {
        let book = Book::new("kjv", "Genesis", 50);
        assert_eq!(book.key, "kjv|genesis");
        assert_eq!(book.version, "kjv");
    }
}
