//! Decoder for the JSON corpus document shape.
//!
//! The document is deliberately loose: a `version` object with optional
//! `id`/`name`/`code`, a required `verses` array, and an optional `books`
//! array of pre-built book records. Extra fields anywhere are ignored
//! rather than rejected.

use crate::error::{ErrorKind, Result};
use crate::models::{Book, Decoded, Verse, Version};
use crate::naming;
use exn::{OptionExt, ResultExt};
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| value.get(*key).and_then(Value::as_str)).map(str::trim).filter(|s| !s.is_empty())
}

fn u32_field(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| {
        let field = value.get(*key)?;
        match field {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    })
}

#[instrument(skip(text), fields(size = text.len(), filename))]
pub fn decode(text: &str, filename: Option<&str>) -> Result<Decoded> {
    let doc: Value =
        serde_json::from_str(text).or_raise(|| ErrorKind::DecodeFailure("malformed JSON".into()))?;

    let meta = doc.get("version").cloned().unwrap_or(Value::Null);
    let name = str_field(&meta, &["name"])
        .map(str::to_string)
        .or_else(|| filename.map(naming::name_from_filename))
        .unwrap_or_else(|| "Unknown".to_string());
    let id = str_field(&meta, &["id"]).map(str::to_string);
    let code = naming::resolve_code(str_field(&meta, &["code"]), filename, &name);
    let version = Version::new(id, name, code, text.len() as u64);

    let rows = doc
        .get("verses")
        .and_then(Value::as_array)
        .ok_or_raise(|| ErrorKind::DecodeFailure("document has no verses array".into()))?;

    let mut verses = Vec::with_capacity(rows.len());
    // For deriving book records when the document doesn't provide them:
    // name and highest chapter per book id, in first-seen order.
    let mut seen: Vec<String> = Vec::new();
    let mut derived: HashMap<String, (String, u32)> = HashMap::new();
    for row in rows {
        let Some(book_id) = str_field(row, &["bookId", "book_id", "book"]) else {
            continue;
        };
        let (Some(chapter), Some(number)) = (u32_field(row, &["chapter"]), u32_field(row, &["verse"])) else {
            continue;
        };
        let book_name = str_field(row, &["bookName", "book_name"]).unwrap_or(book_id).to_string();
        if let Some(verse) = Verse::new(&version.id, book_id, &book_name, chapter, number, str_field(row, &["text"]).unwrap_or_default()) {
            let entry = derived.entry(verse.book_id.clone()).or_insert_with(|| {
                seen.push(verse.book_id.clone());
                (book_name.clone(), 0)
            });
            entry.1 = entry.1.max(chapter);
            verses.push(verse);
        }
    }

    let books = match doc.get("books").and_then(Value::as_array) {
        Some(rows) => rows
            .iter()
            .filter_map(|row| {
                let name = str_field(row, &["name"])?;
                let chapter_count = u32_field(row, &["chapterCount", "chapter_count"]).unwrap_or(0);
                let mut book = Book::new(&version.id, name, chapter_count);
                if let Some(id) = str_field(row, &["id", "bookId"]) {
                    book.id = id.to_string();
                    book.key = format!("{}|{}", version.id, book.id);
                }
                if let Some(abbreviation) = str_field(row, &["abbreviation", "abbrev"]) {
                    book.abbreviation = abbreviation.to_string();
                }
                Some(book)
            })
            .collect(),
        None => seen
            .iter()
            .map(|book_id| {
                let (name, chapter_count) = &derived[book_id];
                let mut book = Book::new(&version.id, name, *chapter_count);
                book.id = book_id.clone();
                book.key = format!("{}|{}", version.id, book_id);
                book
            })
            .collect(),
    };

    Ok(Decoded { version, books, verses })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "version": { "name": "Demo Bible", "code": "DEMO" },
        "verses": [
            { "bookId": "john", "bookName": "John", "chapter": 3, "verse": 16, "text": "For God so loved", "note": "extra" },
            { "bookId": "john", "bookName": "John", "chapter": 4, "verse": 1, "text": "When therefore" },
            { "bookId": "jude", "bookName": "Jude", "chapter": 1, "verse": 2, "text": "Mercy unto you" }
        ]
    }"#;

    #[test]
    fn test_decode_document() {
        let decoded = decode(DOCUMENT, None).unwrap();
        assert_eq!(decoded.version.id, "demo-bible");
        assert_eq!(decoded.version.code, "DEMO");
        assert_eq!(decoded.verses.len(), 3);
        assert_eq!(decoded.verses[0].key, "demo-bible|john|3|16");
    }

    #[test]
    fn test_books_derived_from_verses() {
        let decoded = decode(DOCUMENT, None).unwrap();
        assert_eq!(decoded.books.len(), 2);
        assert_eq!(decoded.books[0].id, "john");
        assert_eq!(decoded.books[0].chapter_count, 4);
        assert_eq!(decoded.books[1].name, "Jude");
    }

    #[test]
    fn test_explicit_books_array_wins() {
        let doc = r#"{
            "version": { "id": "demo", "name": "Demo" },
            "books": [ { "id": "john", "name": "John", "abbreviation": "Jhn", "chapterCount": 21 } ],
            "verses": [ { "bookId": "john", "chapter": 1, "verse": 1, "text": "In the beginning" } ]
        }"#;
        let decoded = decode(doc, None).unwrap();
        assert_eq!(decoded.books.len(), 1);
        assert_eq!(decoded.books[0].chapter_count, 21);
        assert_eq!(decoded.books[0].abbreviation, "Jhn");
        assert_eq!(decoded.books[0].key, "demo|john");
    }

    #[test]
    fn test_missing_verses_array_fails() {
        let err = decode(r#"{ "version": {"name": "Demo"} }"#, None).unwrap_err();
        assert!(err.to_string().contains("verses"));
    }

    #[test]
    fn test_name_from_filename_when_absent() {
        let doc = r#"{ "verses": [ { "bookId": "jude", "chapter": 1, "verse": 1, "text": "Mercy" } ] }"#;
        let decoded = decode(doc, Some("new_english_translation.json")).unwrap();
        assert_eq!(decoded.version.name, "new english translation");
        assert_eq!(decoded.version.id, "new-english-translation");
    }
}
