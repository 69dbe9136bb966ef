mod book;
mod verse;
mod version;

pub use self::book::Book;
pub use self::verse::Verse;
pub use self::version::Version;

/// One decoded corpus: a version plus every book and verse record derived
/// from it. All three decoders converge on this shape before import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub version: Version,
    pub books: Vec<Book>,
    pub verses: Vec<Verse>,
}

/// Lowercase, spaces to hyphens. Used for version ids.
pub(crate) fn slugify(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::slugify;
    use rstest::rstest;

    #[rstest]
    #[case("King James Version", "king-james-version")]
    #[case("  NET  Bible ", "net-bible")]
    #[case("nkjv", "nkjv")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }
}
