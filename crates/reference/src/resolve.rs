//! Prefix-based book lookup shared by the parser, the suggestion engine,
//! and the keystroke validator.

use lectern_decode::Book;
use std::collections::HashSet;

/// All books whose name, id, or abbreviation starts with `query`
/// (case-insensitive). Name-prefix matches sort first, then id and
/// abbreviation matches, each group alphabetical by name. Books sharing a
/// name across versions are collapsed to the first occurrence.
///
/// An empty query matches every book.
pub fn resolve_books<'a>(query: &str, books: &'a [Book]) -> Vec<&'a Book> {
    let query = query.trim().to_lowercase();
    let mut by_name: Vec<&Book> = Vec::new();
    let mut by_alias: Vec<&Book> = Vec::new();
    for book in books {
        if book.name.to_lowercase().starts_with(&query) {
            by_name.push(book);
        } else if book.id.to_lowercase().starts_with(&query)
            || book.abbreviation.to_lowercase().starts_with(&query)
        {
            by_alias.push(book);
        }
    }
    by_name.sort_by(|a, b| a.name.cmp(&b.name));
    by_alias.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen = HashSet::new();
    by_name
        .into_iter()
        .chain(by_alias)
        .filter(|book| seen.insert(book.name.to_lowercase()))
        .collect()
}

/// Split whitespace tokens into a book phrase and the index of the first
/// token after it.
///
/// A leading bare `1`/`2`/`3` followed by a word binds to that word
/// ("1 John"). The phrase then extends greedily over further words as long
/// as the longer phrase still resolves to at least one book, so
/// "Song of Solomon 2:1" consumes three tokens.
pub(crate) fn split_book_phrase(tokens: &[&str], books: &[Book]) -> (String, usize) {
    if tokens.is_empty() {
        return (String::new(), 0);
    }
    let mut end = 1;
    if matches!(tokens[0], "1" | "2" | "3")
        && tokens.len() > 1
        && !tokens[1].starts_with(|c: char| c.is_ascii_digit())
    {
        end = 2;
    }
    let mut phrase = tokens[..end].join(" ");
    while let Some(token) = tokens.get(end) {
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            break;
        }
        let extended = format!("{phrase} {token}");
        if resolve_books(&extended, books).is_empty() {
            break;
        }
        phrase = extended;
        end += 1;
    }
    (phrase, end)
}
