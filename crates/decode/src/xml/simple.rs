//! Decoder for loosely-structured book/chapter/verse XML dialects
//! (Zefania-style and friends). Tag and attribute names vary between
//! exporters, so every lookup goes through a small candidate list.

use super::tree::Element;
use crate::error::{ErrorKind, Result};
use crate::models::{Book, Decoded, Verse, Version};
use crate::{consts, naming};
use tracing::instrument;

const BOOK_TAGS: [&str; 3] = ["book", "b", "biblebook"];
const CHAPTER_TAGS: [&str; 2] = ["chapter", "c"];
const VERSE_TAGS: [&str; 3] = ["verse", "v", "vers"];

const BOOK_NAME_ATTRS: [&str; 4] = ["name", "title", "n", "bname"];
const BOOK_NUMBER_ATTRS: [&str; 3] = ["number", "n", "bnumber"];
const CHAPTER_NUMBER_ATTRS: [&str; 3] = ["number", "n", "cnumber"];
const VERSE_NUMBER_ATTRS: [&str; 3] = ["number", "n", "vnumber"];

const VERSION_NAME_ATTRS: [&str; 3] = ["biblename", "name", "title"];

fn is_one_of(tag: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|candidate| *candidate == tag)
}

fn number_attr(element: &Element, keys: &[&str]) -> Option<u32> {
    element.attr(keys).and_then(|value| value.trim().parse().ok())
}

/// Book name resolution: an explicit non-numeric name attribute first, then
/// a numeric book number mapped through the canonical 66-book ordering.
fn book_name(element: &Element) -> Option<String> {
    if let Some(name) = element.attr(&BOOK_NAME_ATTRS)
        && !name.trim().is_empty()
        && name.trim().parse::<u32>().is_err()
    {
        return Some(name.trim().to_string());
    }
    number_attr(element, &BOOK_NUMBER_ATTRS)
        .and_then(consts::book_name_for_number)
        .map(str::to_string)
}

#[instrument(skip(root), fields(filename))]
pub fn decode(root: &Element, filename: Option<&str>, size_bytes: u64) -> Result<Decoded> {
    let mut book_elements: Vec<&Element> = Vec::new();
    if is_one_of(&root.tag, &BOOK_TAGS) {
        book_elements.push(root);
    }
    book_elements.extend(root.descendants().into_iter().filter(|el| is_one_of(&el.tag, &BOOK_TAGS)));
    if book_elements.is_empty() {
        exn::bail!(ErrorKind::UnsupportedDialect("no book elements found".into()));
    }

    let name = root
        .attr(&VERSION_NAME_ATTRS)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| filename.map(naming::name_from_filename))
        .unwrap_or_else(|| "Unknown".to_string());
    let code = naming::resolve_code(root.attr(&["code", "abbreviation"]), filename, &name);
    let version = Version::new(None, name, code, size_bytes);

    let mut books = Vec::new();
    let mut verses = Vec::new();
    for (position, book_element) in book_elements.iter().enumerate() {
        let name = book_name(book_element);
        // Unnamed books are parsed for their verses but emit no book record.
        let book_id = match &name {
            Some(name) => Book::id_from_name(name),
            None => format!("book{}", position + 1),
        };
        let book_name = name.clone().unwrap_or_default();
        let mut chapter_count = 0u32;
        for (chapter_position, chapter) in book_element
            .descendants()
            .into_iter()
            .filter(|el| is_one_of(&el.tag, &CHAPTER_TAGS))
            .enumerate()
        {
            let chapter_number =
                number_attr(chapter, &CHAPTER_NUMBER_ATTRS).unwrap_or(chapter_position as u32 + 1);
            chapter_count = chapter_count.max(chapter_number);
            for (verse_position, verse) in chapter
                .descendants()
                .into_iter()
                .filter(|el| is_one_of(&el.tag, &VERSE_TAGS))
                .enumerate()
            {
                let verse_number =
                    number_attr(verse, &VERSE_NUMBER_ATTRS).unwrap_or(verse_position as u32 + 1);
                verses.extend(Verse::new(
                    &version.id,
                    &book_id,
                    &book_name,
                    chapter_number,
                    verse_number,
                    verse.text(),
                ));
            }
        }
        if let Some(name) = name {
            books.push(Book::new(&version.id, name, chapter_count));
        }
    }

    Ok(Decoded { version, books, verses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree;

    const ZEFANIA_STYLE: &str = r#"
        <XMLBIBLE biblename="Test Bible">
          <BIBLEBOOK bnumber="1" bname="Genesis">
            <CHAPTER cnumber="1">
              <VERS vnumber="1">In the beginning</VERS>
              <VERS vnumber="2">And the earth</VERS>
            </CHAPTER>
            <CHAPTER cnumber="2">
              <VERS vnumber="1">Thus the heavens</VERS>
            </CHAPTER>
          </BIBLEBOOK>
        </XMLBIBLE>
    "#;

    #[test]
    fn test_decode_zefania_style() {
        let root = tree::parse(ZEFANIA_STYLE).unwrap();
        let decoded = decode(&root, Some("test_bible.xml"), 0).unwrap();
        assert_eq!(decoded.version.name, "Test Bible");
        assert_eq!(decoded.version.id, "test-bible");
        assert_eq!(decoded.books.len(), 1);
        assert_eq!(decoded.books[0].name, "Genesis");
        assert_eq!(decoded.books[0].chapter_count, 2);
        assert_eq!(decoded.verses.len(), 3);
        assert_eq!(decoded.verses[0].key, "test-bible|genesis|1|1");
        assert_eq!(decoded.verses[2].chapter, 2);
    }

    #[test]
    fn test_numeric_book_maps_through_canon() {
        let root = tree::parse(r#"<bible><book number="43"><c n="3"><v n="16">For God</v></c></book></bible>"#)
            .unwrap();
        let decoded = decode(&root, Some("web.xml"), 0).unwrap();
        assert_eq!(decoded.books[0].name, "John");
        assert_eq!(decoded.verses[0].book_id, "john");
    }

    #[test]
    fn test_unnamed_book_is_dropped_but_verses_kept() {
        let root = tree::parse(r#"<bible><book><c n="1"><v n="1">Text</v></c></book></bible>"#).unwrap();
        let decoded = decode(&root, None, 0).unwrap();
        assert!(decoded.books.is_empty());
        assert_eq!(decoded.verses.len(), 1);
        assert_eq!(decoded.verses[0].book_id, "book1");
    }

    #[test]
    fn test_no_books_is_unsupported_dialect() {
        let root = tree::parse("<bible><intro>hello</intro></bible>").unwrap();
        assert!(decode(&root, None, 0).is_err());
    }

    #[test]
    fn test_empty_verse_text_dropped() {
        let root =
            tree::parse(r#"<bible><book name="Jude"><c n="1"><v n="1">  </v><v n="2">Mercy</v></c></book></bible>"#)
                .unwrap();
        let decoded = decode(&root, None, 0).unwrap();
        assert_eq!(decoded.verses.len(), 1);
        assert_eq!(decoded.verses[0].verse, 2);
    }
}
