//! Per-keystroke input gating: accept, reject, or rewrite the field.

use crate::consts::REFERENCE_CHARSET_REGEX;
use crate::resolve::{resolve_books, split_book_phrase};
use crate::suggest::smart_transform;
use lectern_decode::{Book, Version, consts::VERSION_CODES};
use tracing::instrument;

/// Verdict for a single edit of the reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    /// Keep the previous contents; the edit cannot lead to a valid reference.
    Reject,
    /// Substitute the field with this text (smart transform or book
    /// auto-completion).
    Replace(String),
}

/// Validate the transition from `old` to `new` field contents.
///
/// Deletions are always accepted so the user can back out of anything. For
/// insertions the new text must still be a viable prefix of some reference:
/// the book phrase has to resolve, the chapter can't exceed every candidate
/// book's chapter count, and a trailing version token must prefix a known
/// code (imported versions or the built-in dictionary).
#[instrument(level = "trace", skip(books, versions))]
pub fn validate_keystroke(old: &str, new: &str, books: &[Book], versions: &[Version]) -> Decision {
    if new.chars().count() < old.chars().count() {
        return Decision::Accept;
    }
    let candidate = smart_transform(new);
    if !REFERENCE_CHARSET_REGEX.is_match(&candidate) {
        return Decision::Reject;
    }

    let tokens: Vec<&str> = candidate.split_whitespace().collect();
    if tokens.is_empty() {
        return Decision::Accept;
    }
    let (phrase, index) = split_book_phrase(&tokens, books);
    let candidates = resolve_books(&phrase, books);
    if candidates.is_empty() {
        return Decision::Reject;
    }
    let tail = &tokens[index..];

    let mut version_tokens = tail;
    if let Some(reference) = tail.first()
        && reference.starts_with(|c: char| c.is_ascii_digit())
    {
        if !chapter_verse_viable(reference, &candidates) {
            return Decision::Reject;
        }
        version_tokens = &tail[1..];
    }

    match version_tokens {
        [] => {}
        [code] => {
            let partial = code.to_uppercase();
            let known = versions.iter().any(|v| v.code.to_uppercase().starts_with(&partial))
                || VERSION_CODES.iter().any(|c| c.starts_with(&partial));
            if !known {
                return Decision::Reject;
            }
        }
        // Nothing valid follows a version code.
        _ => return Decision::Reject,
    }

    // A uniquely determined book completes itself as soon as it is the only
    // match, saving the rest of the name.
    if tail.is_empty()
        && !candidate.ends_with(char::is_whitespace)
        && let [book] = candidates.as_slice()
        && book.name.len() > phrase.len()
        && book.name.to_lowercase().starts_with(&phrase.to_lowercase())
    {
        return Decision::Replace(format!("{} ", book.name));
    }

    if candidate != new { Decision::Replace(candidate) } else { Decision::Accept }
}

/// Digits only in the chapter, digits and a dash in the verse part, and the
/// chapter must fit at least one candidate book. Chapter numbers only grow
/// as typing continues, so an overflow can be rejected immediately.
fn chapter_verse_viable(reference: &str, candidates: &[&Book]) -> bool {
    let (chapter, verses) = match reference.split_once(':') {
        Some((chapter, verses)) => (chapter, Some(verses)),
        None => (reference, None),
    };
    if chapter.is_empty() || !chapter.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let max_chapter = candidates.iter().map(|book| book.chapter_count).max().unwrap_or(0);
    // An unparseable all-digit chapter has overflowed u32 and so certainly
    // exceeds any known chapter count.
    let within = chapter
        .parse::<u32>()
        .map_or(max_chapter == 0, |number| max_chapter == 0 || number <= max_chapter);
    if !within {
        return false;
    }
    match verses {
        Some(verses) => verses.chars().all(|c| c.is_ascii_digit() || c == '-'),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn books() -> Vec<Book> {
        vec![
            Book::new("nkjv", "Matthew", 28),
            Book::new("nkjv", "Mark", 16),
            Book::new("nkjv", "John", 21),
            Book::new("nkjv", "Jude", 1),
            Book::new("nkjv", "1 John", 5),
        ]
    }

    fn versions() -> Vec<Version> {
        vec![Version::new(None, "New King James Version", "NKJV", 0)]
    }

    fn check(old: &str, new: &str) -> Decision {
        validate_keystroke(old, new, &books(), &versions())
    }

    #[rstest]
    #[case("", "J")]
    #[case("J", "Jo ")]
    #[case("John ", "John 3")]
    #[case("John 3:", "John 3:1")]
    #[case("John 3:16", "John 3:16-")]
    #[case("John 3:16-", "John 3:16-18")]
    #[case("John 3:16 ", "John 3:16 N")]
    #[case("John 3:16 N", "John 3:16 NK")]
    fn test_accepts_viable_prefixes(#[case] old: &str, #[case] new: &str) {
        assert_eq!(check(old, new), Decision::Accept, "{old:?} -> {new:?}");
    }

    #[rstest]
    #[case("", "Q")]
    #[case("John", "Johnx")]
    #[case("John 3:16", "John 3:16x")]
    #[case("John 3:16 N", "John 3:16 Nx")]
    #[case("John 3:16 NKJV", "John 3:16 NKJV x")]
    #[case("John 3", "John 3!")]
    fn test_rejects_dead_ends(#[case] old: &str, #[case] new: &str) {
        assert_eq!(check(old, new), Decision::Reject, "{old:?} -> {new:?}");
    }

    #[test]
    fn test_deletion_is_always_accepted() {
        assert_eq!(check("Johnzzz", "Johnzz"), Decision::Accept);
    }

    #[test]
    fn test_chapter_beyond_count_is_rejected() {
        assert_eq!(check("Matthew 2", "Matthew 29"), Decision::Reject);
        assert_eq!(check("Matthew 2", "Matthew 28"), Decision::Accept);
    }

    #[test]
    fn test_overflowing_chapter_digits_are_rejected() {
        assert_eq!(check("Matthew 9", "Matthew 999999999999"), Decision::Reject);
    }

    #[test]
    fn test_smart_transform_rewrites_trailing_space() {
        assert_eq!(check("Matthew 3", "Matthew 3 "), Decision::Replace("Matthew 3:".into()));
    }

    #[test]
    fn test_unique_book_auto_completes() {
        assert_eq!(check("Matthe", "Matthew"), Decision::Accept);
        assert_eq!(check("Mat", "Matt"), Decision::Replace("Matthew ".into()));
        assert_eq!(check("Jud", "Jude"), Decision::Accept);
    }

    #[test]
    fn test_ambiguous_book_is_not_completed() {
        // "Ma" matches Matthew, Mark: no rewrite.
        assert_eq!(check("M", "Ma"), Decision::Accept);
    }

    #[test]
    fn test_dictionary_codes_allowed_without_import() {
        // ESV isn't imported but is in the built-in dictionary.
        assert_eq!(check("John 3:16 ", "John 3:16 E"), Decision::Accept);
    }
}
