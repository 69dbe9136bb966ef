//! Static lookup tables shared by the decoders.
//!
//! All of these are pure, immutable data: the canonical 66-book Protestant
//! ordering, the OSIS book-abbreviation table, and the dictionary of known
//! translation codes matched against filenames.

/// Canonical 66-book Protestant ordering, indexed by `number - 1`.
pub static CANONICAL_BOOKS: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// OSIS `osisID` book abbreviations, in canonical order (parallel to
/// [`CANONICAL_BOOKS`]).
pub static OSIS_BOOK_IDS: [&str; 66] = [
    "Gen", "Exod", "Lev", "Num", "Deut", "Josh", "Judg", "Ruth", "1Sam", "2Sam", "1Kgs", "2Kgs", "1Chr", "2Chr",
    "Ezra", "Neh", "Esth", "Job", "Ps", "Prov", "Eccl", "Song", "Isa", "Jer", "Lam", "Ezek", "Dan", "Hos", "Joel",
    "Amos", "Obad", "Jonah", "Mic", "Nah", "Hab", "Zeph", "Hag", "Zech", "Mal", "Matt", "Mark", "Luke", "John",
    "Acts", "Rom", "1Cor", "2Cor", "Gal", "Eph", "Phil", "Col", "1Thess", "2Thess", "1Tim", "2Tim", "Titus",
    "Phlm", "Heb", "Jas", "1Pet", "2Pet", "1John", "2John", "3John", "Jude", "Rev",
];

/// Known translation display codes. Matched as case-insensitive substrings
/// against filenames; see [`longest_code_in`].
pub static VERSION_CODES: [&str; 80] = [
    "AKJV", "AMP", "AMPC", "ASV", "BBE", "BRG", "BSB", "CEB", "CEV", "CJB", "CSB", "DARBY", "DLNT", "DRA", "EHV",
    "ERV", "ESV", "ESVUK", "EXB", "GNT", "GNV", "GW", "HCSB", "ICB", "ISV", "JUB", "KJ21", "KJV", "KJVA", "LEB",
    "LITV", "LSB", "LXX", "MEV", "MKJV", "MSG", "NABRE", "NASB", "NASB1995", "NASB2020", "NCB", "NCV", "NET",
    "NHEB", "NIRV", "NIV", "NIV1984", "NIVUK", "NJB", "NKJV", "NLT", "NLV", "NMB", "NOG", "NRSV", "NRSVA",
    "NRSVUE", "NTE", "OJB", "PHILLIPS", "RGT", "RSV", "RSVCE", "RV1909", "SBLGNT", "TLB", "TLV", "TNIV", "TPT",
    "VOICE", "WEB", "WEBBE", "WLC", "WYC", "YLT", "YLT98", "GNB", "HNV", "JPS", "VULGATE",
];

/// Resolve an OSIS abbreviation (e.g. "Gen", "1John") to its canonical book
/// name. Case-insensitive.
pub fn book_name_for_osis_id(osis_id: &str) -> Option<&'static str> {
    OSIS_BOOK_IDS
        .iter()
        .position(|id| id.eq_ignore_ascii_case(osis_id))
        .map(|index| CANONICAL_BOOKS[index])
}

/// Resolve a 1-based canonical book number to its name.
pub fn book_name_for_number(number: u32) -> Option<&'static str> {
    (1..=66).contains(&number).then(|| CANONICAL_BOOKS[(number - 1) as usize])
}

/// Find the longest known version code appearing as a substring of `text`.
///
/// Longest-first avoids partial collisions: `NRSVA_bible.xml` resolves to
/// "NRSVA", not "RSV".
pub fn longest_code_in(text: &str) -> Option<&'static str> {
    let haystack = text.to_uppercase();
    VERSION_CODES.iter().filter(|code| haystack.contains(**code)).max_by_key(|code| code.len()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_tables_are_parallel() {
        assert_eq!(CANONICAL_BOOKS.len(), OSIS_BOOK_IDS.len());
    }

    #[rstest]
    #[case("Gen", Some("Genesis"))]
    #[case("1john", Some("1 John"))]
    #[case("REV", Some("Revelation"))]
    #[case("Sir", None)]
    fn test_osis_lookup(#[case] id: &str, #[case] expected: Option<&str>) {
        assert_eq!(book_name_for_osis_id(id), expected);
    }

    #[rstest]
    #[case(1, Some("Genesis"))]
    #[case(66, Some("Revelation"))]
    #[case(0, None)]
    #[case(67, None)]
    fn test_number_lookup(#[case] number: u32, #[case] expected: Option<&str>) {
        assert_eq!(book_name_for_number(number), expected);
    }

    #[rstest]
    #[case("NRSVA_bible.xml", Some("NRSVA"))]
    #[case("nrsv-anglicised", Some("NRSV"))]
    #[case("kjv.json", Some("KJV"))]
    #[case("NASB2020_osis", Some("NASB2020"))]
    #[case("mystery-translation", None)]
    fn test_longest_code_wins(#[case] filename: &str, #[case] expected: Option<&str>) {
        assert_eq!(longest_code_in(filename), expected);
    }
}
