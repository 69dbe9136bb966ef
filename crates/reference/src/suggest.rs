//! Ranked autocomplete for partially typed references.

use crate::consts::SMART_TRANSFORM_REGEX;
use crate::resolve::{resolve_books, split_book_phrase};
use lectern_decode::{Book, Version};
use serde::Serialize;
use tracing::instrument;

pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionKind {
    Book,
    Chapter,
    Verse,
    Version,
}

/// One completion candidate. `text` is the full replacement input, not a
/// fragment to append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    /// Extra display context, e.g. the full translation name for a version
    /// code suggestion.
    pub description: Option<String>,
}

/// Rewrite "Book 3 " as "Book 3:", on the theory that a space after a
/// chapter number means the user is heading for a verse. Any other input
/// is returned unchanged.
pub fn smart_transform(text: &str) -> String {
    match SMART_TRANSFORM_REGEX.captures(text) {
        Some(captures) => format!("{}:", &captures[1]),
        None => text.to_string(),
    }
}

/// Completions for `text`, most specific phase first: book names while the
/// book is being typed, then chapter numbers, verse numbers, and finally
/// version codes once a full reference is present. Only one phase ever
/// contributes, and at most [`MAX_SUGGESTIONS`] entries are returned.
pub fn get_suggestions(text: &str, books: &[Book], versions: &[Version]) -> Vec<Suggestion> {
    get_suggestions_limited(text, books, versions, MAX_SUGGESTIONS)
}

/// [`get_suggestions`] with a configured entry cap instead of the default.
#[instrument(level = "trace", skip(books, versions))]
pub fn get_suggestions_limited(
    text: &str,
    books: &[Book],
    versions: &[Version],
    limit: usize,
) -> Vec<Suggestion> {
    let text = smart_transform(text);
    if limit == 0 || text.trim().is_empty() {
        return Vec::new();
    }
    let ends_with_space = text.ends_with(char::is_whitespace);
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (phrase, index) = split_book_phrase(&tokens, books);
    let tail = &tokens[index..];

    // Still typing the book name.
    if tail.is_empty() && !ends_with_space {
        return resolve_books(&phrase, books)
            .into_iter()
            .take(limit)
            .map(|book| Suggestion {
                text: book.name.clone(),
                kind: SuggestionKind::Book,
                description: None,
            })
            .collect();
    }

    // A chapter/verse token exists and either a second tail token or a
    // trailing space follows it: offer version codes.
    if !tail.is_empty() && (tail.len() >= 2 || ends_with_space) {
        let partial = if ends_with_space { "" } else { tail[tail.len() - 1] };
        let prefix = &text[..text.len() - partial.len()];
        return versions
            .iter()
            .filter(|version| version.code.to_lowercase().starts_with(&partial.to_lowercase()))
            .take(limit)
            .map(|version| Suggestion {
                text: format!("{prefix}{}", version.code),
                kind: SuggestionKind::Version,
                description: Some(version.name.clone()),
            })
            .collect();
    }

    let Some(reference) = tail.first() else {
        // Book phrase just completed ("Matthew "): nudge toward chapter 1.
        if resolve_books(&phrase, books).is_empty() {
            return Vec::new();
        }
        return vec![Suggestion {
            text: format!("{text}1"),
            kind: SuggestionKind::Chapter,
            description: None,
        }];
    };

    if let Some((_, verse_part)) = reference.split_once(':') {
        // A range means the reference is already complete.
        if verse_part.contains('-') {
            return Vec::new();
        }
        let start: u32 = verse_part.parse().unwrap_or(1);
        let base = match text.rfind(':') {
            Some(colon) => &text[..=colon],
            None => return Vec::new(),
        };
        return (start..=start.saturating_add(limit as u32 - 1))
            .map(|verse| Suggestion {
                text: format!("{base}{verse}"),
                kind: SuggestionKind::Verse,
                description: None,
            })
            .collect();
    }

    if reference.chars().all(|c| c.is_ascii_digit()) {
        let start: u32 = reference.parse().unwrap_or(1);
        let max_chapter =
            resolve_books(&phrase, books).iter().map(|book| book.chapter_count).max().unwrap_or(0);
        let prefix = &text[..text.len() - reference.len()];
        return (start..=start.saturating_add(limit as u32 - 1))
            .filter(|chapter| max_chapter == 0 || *chapter <= max_chapter)
            .map(|chapter| Suggestion {
                text: format!("{prefix}{chapter}"),
                kind: SuggestionKind::Chapter,
                description: None,
            })
            .collect();
    }
    Vec::new()
}
