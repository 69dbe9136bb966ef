//! Free-text reference parsing: "1 John 1:9-10 NKJV" into its parts.

use crate::resolve::{resolve_books, split_book_phrase};
use derive_more::Display;
use lectern_decode::Book;
use serde::Serialize;
use tracing::instrument;

/// A structured reading of a free-text reference. Parsing never fails as a
/// whole: whatever could be understood is filled in and problems accumulate
/// in `errors`, so a half-typed reference stays usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedReference {
    /// First resolver match for the book phrase, if any.
    pub book: Option<Book>,
    pub chapter: Option<u32>,
    pub verse_start: Option<u32>,
    /// Set only when `verse_start` is; "9-" and "9" both leave this `None`.
    pub verse_end: Option<u32>,
    /// Trailing version token, uppercased. Unknown codes pass through.
    pub version_code: Option<String>,
    pub errors: Vec<ReferenceError>,
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
pub enum ReferenceError {
    #[display("no book matches {_0:?}")]
    UnknownBook(String),
    #[display("{_0:?} is not a number")]
    MalformedNumber(String),
    #[display("chapter {chapter} is beyond the last chapter ({max})")]
    ChapterOutOfRange { chapter: u32, max: u32 },
}

/// Parse `text` against the given book list.
///
/// The grammar is `BookPhrase [Chapter[:VerseStart[-VerseEnd]]] [Version]`.
/// Components that haven't been typed yet ("John 3:") are simply absent and
/// never produce an error. Inverted ranges ("3:9-2") are preserved as
/// written.
#[instrument(level = "trace", skip(books))]
pub fn parse_reference(text: &str, books: &[Book]) -> ParsedReference {
    let mut parsed = ParsedReference::default();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return parsed;
    }

    let (phrase, mut index) = split_book_phrase(&tokens, books);
    match resolve_books(&phrase, books).first() {
        Some(book) => parsed.book = Some((*book).clone()),
        None => parsed.errors.push(ReferenceError::UnknownBook(phrase)),
    }

    if let Some(token) = tokens.get(index)
        && token.starts_with(|c: char| c.is_ascii_digit())
    {
        parse_chapter_verse(token, &mut parsed);
        index += 1;
    }

    if let Some(token) = tokens.get(index)
        && token.chars().all(|c| c.is_ascii_alphanumeric())
    {
        parsed.version_code = Some(token.to_uppercase());
    }

    if let (Some(book), Some(chapter)) = (&parsed.book, parsed.chapter)
        && book.chapter_count > 0
        && chapter > book.chapter_count
    {
        parsed
            .errors
            .push(ReferenceError::ChapterOutOfRange { chapter, max: book.chapter_count });
    }
    parsed
}

fn parse_chapter_verse(token: &str, parsed: &mut ParsedReference) {
    let (chapter, verses) = match token.split_once(':') {
        Some((chapter, verses)) => (chapter, Some(verses)),
        None => (token, None),
    };
    match chapter.parse() {
        Ok(chapter) => parsed.chapter = Some(chapter),
        Err(_) => parsed.errors.push(ReferenceError::MalformedNumber(chapter.to_string())),
    }
    // "3:" means the verse hasn't been typed yet.
    let Some(verses) = verses.filter(|v| !v.is_empty()) else {
        return;
    };
    let (start, end) = match verses.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (verses, None),
    };
    match start.parse() {
        Ok(verse) => parsed.verse_start = Some(verse),
        Err(_) => parsed.errors.push(ReferenceError::MalformedNumber(start.to_string())),
    }
    if parsed.verse_start.is_some()
        && let Some(end) = end.filter(|e| !e.is_empty())
    {
        match end.parse() {
            Ok(verse) => parsed.verse_end = Some(verse),
            Err(_) => parsed.errors.push(ReferenceError::MalformedNumber(end.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn corpus() -> Vec<Book> {
        vec![
            Book::new("nkjv", "Matthew", 28),
            Book::new("nkjv", "John", 21),
            Book::new("nkjv", "1 John", 5),
            Book::new("nkjv", "Song of Solomon", 8),
        ]
    }

    #[test]
    fn test_full_reference() {
        let parsed = parse_reference("1 John 1:9-10 NKJV", &corpus());
        assert_eq!(parsed.book.as_ref().map(|b| b.name.as_str()), Some("1 John"));
        assert_eq!(parsed.chapter, Some(1));
        assert_eq!(parsed.verse_start, Some(9));
        assert_eq!(parsed.verse_end, Some(10));
        assert_eq!(parsed.version_code.as_deref(), Some("NKJV"));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_single_verse() {
        let parsed = parse_reference("Matthew 3:1", &corpus());
        assert_eq!(parsed.book.as_ref().map(|b| b.name.as_str()), Some("Matthew"));
        assert_eq!(parsed.chapter, Some(3));
        assert_eq!(parsed.verse_start, Some(1));
        assert_eq!(parsed.verse_end, None);
        assert_eq!(parsed.version_code, None);
        assert!(parsed.errors.is_empty());
    }

    #[rstest]
    #[case("Matthew")]
    #[case("Matthew 3")]
    #[case("Matthew 3:")]
    #[case("Matthew 3:16-")]
    #[case("Song of Solomon 2:1")]
    fn test_partial_references_never_error(#[case] text: &str) {
        assert!(parse_reference(text, &corpus()).errors.is_empty(), "{text:?}");
    }

    #[test]
    fn test_unknown_book_is_reported() {
        let parsed = parse_reference("Hezekiah 3:16", &corpus());
        assert_eq!(parsed.book, None);
        assert_eq!(parsed.errors, vec![ReferenceError::UnknownBook("Hezekiah".into())]);
        // The rest of the reference still parses.
        assert_eq!(parsed.chapter, Some(3));
        assert_eq!(parsed.verse_start, Some(16));
    }

    #[test]
    fn test_chapter_out_of_range() {
        let parsed = parse_reference("Matthew 29:1", &corpus());
        assert_eq!(parsed.errors, vec![ReferenceError::ChapterOutOfRange { chapter: 29, max: 28 }]);
    }

    #[test]
    fn test_inverted_range_is_preserved() {
        let parsed = parse_reference("John 3:9-2", &corpus());
        assert_eq!(parsed.verse_start, Some(9));
        assert_eq!(parsed.verse_end, Some(2));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_unknown_version_code_passes_through() {
        let parsed = parse_reference("John 3:16 xyz", &corpus());
        assert_eq!(parsed.version_code.as_deref(), Some("XYZ"));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_malformed_chapter() {
        let parsed = parse_reference("John 3a:16", &corpus());
        assert_eq!(parsed.errors, vec![ReferenceError::MalformedNumber("3a".into())]);
    }
}
