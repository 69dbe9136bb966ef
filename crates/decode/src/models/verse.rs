use serde::{Deserialize, Serialize};

/// A single verse record. Unique within a version by
/// `(bookId, chapter, verse)`; only verses with non-empty trimmed text are
/// ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Composite primary key: `version|bookId|chapter|verse`.
    pub key: String,
    pub version: String,
    pub book_id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl Verse {
    /// Build a verse record, returning `None` for empty trimmed text.
    pub fn new(
        version: impl Into<String>,
        book_id: impl Into<String>,
        book_name: impl Into<String>,
        chapter: u32,
        verse: u32,
        text: impl AsRef<str>,
    ) -> Option<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return None;
        }
        let version = version.into();
        let book_id = book_id.into();
        let key = Self::key_for(&version, &book_id, chapter, verse);
        Some(Self {
            key,
            version,
            book_id,
            book_name: book_name.into(),
            chapter,
            verse,
            text: text.to_string(),
        })
    }

    pub fn key_for(version: &str, book_id: &str, chapter: u32, verse: u32) -> String {
        format!("{version}|{book_id}|{chapter}|{verse}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_dropped() {
        assert!(Verse::new("kjv", "genesis", "Genesis", 1, 1, "   ").is_none());
    }

    #[test]
    fn test_key_shape() {
        let verse = Verse::new("kjv", "genesis", "Genesis", 1, 1, " In the beginning ").unwrap();
        assert_eq!(verse.key, "kjv|genesis|1|1");
        assert_eq!(verse.text, "In the beginning");
    }
}
