//! Decoder for OSIS XML.
//!
//! Book containers are `div[type=book]` (falling back to any `div[osisID]`
//! whose id has no `.` and maps to a known OSIS abbreviation). Verses come in
//! two encodings: self-contained `<verse osisID="Book.C.V">text</verse>`
//! elements, and milestone pairs (`sID` start, matching `eID` end) whose text
//! lives in the sibling nodes between the markers.

use super::tree::{Element, Node};
use crate::error::{ErrorKind, Result};
use crate::models::{Book, Decoded, Verse, Version};
use crate::{consts, naming};
use tracing::instrument;

/// `(chapter, verse)` from an osisID like `Gen.1.1`.
fn chapter_verse(osis_id: &str) -> Option<(u32, u32)> {
    let mut parts = osis_id.split('.');
    let _book = parts.next()?;
    let chapter = parts.next()?.trim().parse().ok()?;
    let verse = parts.next()?.trim().parse().ok()?;
    Some((chapter, verse))
}

struct RawVerse {
    chapter: u32,
    verse: u32,
    text: String,
}

/// Walk one sibling list, recursing into containers and reconstructing
/// milestone-delimited verses with an explicit indexed scan.
fn collect_verses(children: &[Node], out: &mut Vec<RawVerse>) {
    let mut index = 0;
    while index < children.len() {
        let Node::Element(element) = &children[index] else {
            index += 1;
            continue;
        };
        if element.tag != "verse" {
            collect_verses(&element.children, out);
            index += 1;
            continue;
        }
        if let Some(start_id) = element.attr(&["sid"]) {
            // Milestone start: concatenate sibling content until the
            // matching end marker or the next verse start.
            let mut text = element.text();
            let mut scan = index + 1;
            while scan < children.len() {
                match &children[scan] {
                    Node::Element(sibling) if sibling.tag == "verse" => {
                        if sibling.attr(&["eid"]) == Some(start_id) {
                            scan += 1;
                        }
                        break;
                    },
                    Node::Element(sibling) => {
                        text.push_str(&sibling.text());
                        scan += 1;
                    },
                    Node::Text(sibling) => {
                        text.push_str(sibling);
                        scan += 1;
                    },
                }
            }
            if let Some((chapter, verse)) = chapter_verse(start_id) {
                out.push(RawVerse { chapter, verse, text });
            }
            index = scan;
        } else if let Some(osis_id) = element.attr(&["osisid"]) {
            if let Some((chapter, verse)) = chapter_verse(osis_id) {
                out.push(RawVerse { chapter, verse, text: element.text() });
            }
            index += 1;
        } else {
            // A stray end marker, or a verse we can't identify.
            index += 1;
        }
    }
}

/// A div counts as a book container if it's explicitly typed as one, or if
/// its osisID is a bare known book abbreviation.
fn book_containers<'a>(root: &'a Element) -> Vec<(&'a Element, &'static str)> {
    let divs: Vec<&Element> = root.descendants().into_iter().filter(|el| el.tag == "div").collect();
    let typed: Vec<(&Element, &'static str)> = divs
        .iter()
        .filter(|div| div.attr(&["type"]) == Some("book"))
        .filter_map(|div| {
            let osis_id = div.attr(&["osisid"])?;
            Some((*div, consts::book_name_for_osis_id(osis_id)?))
        })
        .collect();
    if !typed.is_empty() {
        return typed;
    }
    divs.into_iter()
        .filter_map(|div| {
            let osis_id = div.attr(&["osisid"])?;
            if osis_id.contains('.') {
                return None;
            }
            Some((div, consts::book_name_for_osis_id(osis_id)?))
        })
        .collect()
}

fn version_name(root: &Element, filename: Option<&str>) -> String {
    // Header <work><title> first, then the osisText work id.
    let elements = root.descendants();
    if let Some(work) = elements.iter().find(|el| el.tag == "work")
        && let Some(title) = work.child_elements().find(|el| el.tag == "title")
    {
        let title = title.text().trim().to_string();
        if !title.is_empty() {
            return title;
        }
    }
    if let Some(text) = elements.iter().find(|el| el.tag == "osistext")
        && let Some(work_id) = text.attr(&["osisidwork"])
        && !work_id.trim().is_empty()
    {
        return work_id.trim().to_string();
    }
    filename.map(naming::name_from_filename).unwrap_or_else(|| "Unknown".to_string())
}

#[instrument(skip(root), fields(filename))]
pub fn decode(root: &Element, filename: Option<&str>, size_bytes: u64) -> Result<Decoded> {
    let containers = book_containers(root);
    if containers.is_empty() {
        exn::bail!(ErrorKind::UnsupportedDialect("no OSIS book divs found".into()));
    }

    let name = version_name(root, filename);
    let work_id = root.descendants().into_iter().find(|el| el.tag == "osistext").and_then(|el| el.attr(&["osisidwork"]).map(str::to_string));
    let code = naming::resolve_code(work_id.as_deref(), filename, &name);
    let version = Version::new(None, name, code, size_bytes);

    let mut books = Vec::new();
    let mut verses = Vec::new();
    for (container, book_name) in containers {
        let mut raw = Vec::new();
        collect_verses(&container.children, &mut raw);
        let book_id = Book::id_from_name(book_name);
        let mut chapter_count = 0u32;
        for entry in raw {
            chapter_count = chapter_count.max(entry.chapter);
            verses.extend(Verse::new(&version.id, &book_id, book_name, entry.chapter, entry.verse, &entry.text));
        }
        books.push(Book::new(&version.id, book_name, chapter_count));
    }

    Ok(Decoded { version, books, verses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree;

    const SELF_CONTAINED: &str = r#"
        <osis>
          <osisText osisIDWork="KJV">
            <div type="book" osisID="Gen">
              <chapter osisID="Gen.1">
                <verse osisID="Gen.1.1">In the beginning God created.</verse>
                <verse osisID="Gen.1.2">And the earth was without form.</verse>
              </chapter>
            </div>
          </osisText>
        </osis>
    "#;

    const MILESTONED: &str = r#"
        <osis>
          <osisText osisIDWork="WEB">
            <div type="book" osisID="Gen">
              <p>
                <verse sID="Gen.1.1"/>text<verse eID="Gen.1.1"/>
                <verse sID="Gen.1.2"/>more <seg>words</seg> here<verse eID="Gen.1.2"/>
              </p>
            </div>
          </osisText>
        </osis>
    "#;

    #[test]
    fn test_self_contained_verses() {
        let root = tree::parse(SELF_CONTAINED).unwrap();
        let decoded = decode(&root, Some("kjv.xml"), 0).unwrap();
        assert_eq!(decoded.books.len(), 1);
        assert_eq!(decoded.books[0].name, "Genesis");
        assert_eq!(decoded.version.code, "KJV");
        assert_eq!(decoded.verses.len(), 2);
        assert_eq!(decoded.verses[0].text, "In the beginning God created.");
        assert_eq!(decoded.verses[1].verse, 2);
    }

    #[test]
    fn test_milestone_reconstruction() {
        let root = tree::parse(MILESTONED).unwrap();
        let decoded = decode(&root, Some("web.xml"), 0).unwrap();
        assert_eq!(decoded.verses.len(), 2);
        assert_eq!(decoded.verses[0].text, "text");
        assert_eq!(decoded.verses[1].text, "more words here");
    }

    #[test]
    fn test_unclosed_milestone_stops_at_next_start() {
        let xml = r#"
            <osis><osisText>
              <div type="book" osisID="Jude">
                <p><verse sID="Jude.1.1"/>first words
                <verse sID="Jude.1.2"/>second words<verse eID="Jude.1.2"/></p>
              </div>
            </osisText></osis>
        "#;
        let root = tree::parse(xml).unwrap();
        let decoded = decode(&root, None, 0).unwrap();
        assert_eq!(decoded.verses.len(), 2);
        assert!(decoded.verses[0].text.contains("first words"));
        assert!(!decoded.verses[0].text.contains("second"));
    }

    #[test]
    fn test_fallback_to_bare_osis_id_divs() {
        let xml = r#"
            <osis><osisText>
              <div osisID="Phlm">
                <verse osisID="Phlm.1.1">Paul, a prisoner.</verse>
              </div>
              <div osisID="Phlm.1">ignored, has a dot</div>
            </osisText></osis>
        "#;
        let root = tree::parse(xml).unwrap();
        let decoded = decode(&root, None, 0).unwrap();
        assert_eq!(decoded.books.len(), 1);
        assert_eq!(decoded.books[0].name, "Philemon");
        assert_eq!(decoded.books[0].chapter_count, 1);
    }

    #[test]
    fn test_chapter_count_tracks_highest_chapter() {
        let xml = r#"
            <osis><osisText>
              <div type="book" osisID="Titus">
                <verse osisID="Titus.3.15">Grace be with you all.</verse>
                <verse osisID="Titus.1.1">Paul, a servant of God.</verse>
              </div>
            </osisText></osis>
        "#;
        let root = tree::parse(xml).unwrap();
        let decoded = decode(&root, None, 0).unwrap();
        assert_eq!(decoded.books[0].chapter_count, 3);
    }
}
