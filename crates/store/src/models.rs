//! Row models converting between canonical records and SQLite rows.

use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use lectern_decode::{Book, Verse, Version};
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct VersionRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) last_updated: i64,
    pub(crate) size_bytes: i64,
}

impl TryFrom<&Version> for VersionRow {
    type Error = Error;
    fn try_from(version: &Version) -> Result<Self, Self::Error> {
        Ok(Self {
            id: version.id.clone(),
            name: version.name.clone(),
            code: version.code.clone(),
            last_updated: version.last_updated.unix_timestamp(),
            size_bytes: i64::try_from(version.size_bytes).or_raise(|| ErrorKind::InvalidData("size"))?,
        })
    }
}

impl TryFrom<VersionRow> for Version {
    type Error = Error;
    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            code: row.code,
            last_updated: UtcDateTime::from_unix_timestamp(row.last_updated)
                .or_raise(|| ErrorKind::InvalidData("last updated"))?,
            size_bytes: u64::try_from(row.size_bytes).or_raise(|| ErrorKind::InvalidData("size"))?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BookRow {
    pub(crate) key: String,
    pub(crate) version: String,
    pub(crate) book_id: String,
    pub(crate) name: String,
    pub(crate) abbreviation: String,
    pub(crate) chapter_count: i64,
}

impl TryFrom<&Book> for BookRow {
    type Error = Error;
    fn try_from(book: &Book) -> Result<Self, Self::Error> {
        Ok(Self {
            key: book.key.clone(),
            version: book.version.clone(),
            book_id: book.id.clone(),
            name: book.name.clone(),
            abbreviation: book.abbreviation.clone(),
            chapter_count: i64::from(book.chapter_count),
        })
    }
}

impl TryFrom<BookRow> for Book {
    type Error = Error;
    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.key,
            version: row.version,
            id: row.book_id,
            name: row.name,
            abbreviation: row.abbreviation,
            chapter_count: u32::try_from(row.chapter_count)
                .or_raise(|| ErrorKind::InvalidData("chapter count"))?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct VerseRow {
    pub(crate) key: String,
    pub(crate) version: String,
    pub(crate) book_id: String,
    pub(crate) book_name: String,
    pub(crate) chapter: i64,
    pub(crate) verse: i64,
    pub(crate) text: String,
}

impl TryFrom<&Verse> for VerseRow {
    type Error = Error;
    fn try_from(verse: &Verse) -> Result<Self, Self::Error> {
        Ok(Self {
            key: verse.key.clone(),
            version: verse.version.clone(),
            book_id: verse.book_id.clone(),
            book_name: verse.book_name.clone(),
            chapter: i64::from(verse.chapter),
            verse: i64::from(verse.verse),
            text: verse.text.clone(),
        })
    }
}

impl TryFrom<VerseRow> for Verse {
    type Error = Error;
    fn try_from(row: VerseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.key,
            version: row.version,
            book_id: row.book_id,
            book_name: row.book_name,
            chapter: u32::try_from(row.chapter).or_raise(|| ErrorKind::InvalidData("chapter"))?,
            verse: u32::try_from(row.verse).or_raise(|| ErrorKind::InvalidData("verse"))?,
            text: row.text,
        })
    }
}
