use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// "Book 3 " -> "Book 3:"; requires a word containing a letter before the
// number so a bare numbered-book prefix ("1 ") is left alone.
regex!(SMART_TRANSFORM_REGEX, r"^(.*[A-Za-z]\S*\s\d+)\s$");
// Every character a reference can ever contain.
regex!(REFERENCE_CHARSET_REGEX, r"^[A-Za-z0-9\s:.\-]*$");
