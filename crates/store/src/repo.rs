//! Repository for version, book, and verse records.
//!
//! All mutation is scoped by version id: an import replaces everything the
//! store holds for that id, and removal deletes it outright. Versions,
//! books, and verses are only ever created here; the reference crates read
//! them through [`list_books`](Repository::list_books) /
//! [`list_versions`](Repository::list_versions).

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{BookRow, VerseRow, VersionRow};
use exn::ResultExt;
use lectern_decode::{Book, Decoded, Phase, Progress, Verse, Version};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

/// Verse insert batch size. One `importing` progress event is emitted per
/// batch.
const BATCH_SIZE: usize = 500;

/// Repository for the corpus tables.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// List every imported version, ordered by name.
    pub async fn list_versions(&self) -> Result<Vec<Version>> {
        let rows: Vec<VersionRow> = sqlx::query_as(include_str!("../queries/list_versions.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Version::try_from).collect()
    }

    /// List every book across all versions, ordered by name.
    ///
    /// This is the corpus-wide known-books list the book resolver matches
    /// against; duplicate names across versions are collapsed downstream.
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/list_books.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    /// List the books of one version, ordered by name.
    pub async fn list_books_for_version(&self, version_id: impl AsRef<str>) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/list_books_for_version.sql"))
            .bind(version_id.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Book::try_from).collect()
    }

    /// Count the verse records stored for one version.
    pub async fn count_verses(&self, version_id: impl AsRef<str>) -> Result<u64> {
        let row: (i64,) = sqlx::query_as(include_str!("../queries/count_verses.sql"))
            .bind(version_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(row.0).or_raise(|| ErrorKind::InvalidData("verse count"))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Fetch the verses for a resolved reference: a whole chapter, a single
    /// verse, or an explicit verse range. An inverted range yields no rows.
    pub async fn lookup_verses(
        &self,
        version_id: impl AsRef<str>,
        book_id: impl AsRef<str>,
        chapter: u32,
        verse_start: Option<u32>,
        verse_end: Option<u32>,
    ) -> Result<Vec<Verse>> {
        let rows: Vec<VerseRow> = match (verse_start, verse_end) {
            (None, _) => {
                sqlx::query_as(include_str!("../queries/lookup_chapter.sql"))
                    .bind(version_id.as_ref())
                    .bind(book_id.as_ref())
                    .bind(i64::from(chapter))
                    .fetch_all(&self.pool)
                    .await
            },
            (Some(start), end) => {
                sqlx::query_as(include_str!("../queries/lookup_verse_range.sql"))
                    .bind(version_id.as_ref())
                    .bind(book_id.as_ref())
                    .bind(i64::from(chapter))
                    .bind(i64::from(start))
                    .bind(i64::from(end.unwrap_or(start)))
                    .fetch_all(&self.pool)
                    .await
            },
        }
        .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Verse::try_from).collect()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert or replace a version record.
    pub async fn put_version(&self, version: &Version) -> Result<()> {
        let mut conn = self.pool.acquire().await.or_raise(|| ErrorKind::Database)?;
        Self::put_version_on(&mut conn, version).await
    }

    /// Delete a version and everything stored under it.
    #[instrument(skip(self))]
    pub async fn delete_version_data(&self, version_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        Self::delete_verses_by_version(&mut tx, version_id).await?;
        Self::delete_books_by_version(&mut tx, version_id).await?;
        sqlx::query(include_str!("../queries/delete_version.sql"))
            .bind(version_id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)
    }

    // Transaction-scoped statements composing the import sequence. Each
    // takes the caller's open transaction connection.

    async fn delete_verses_by_version(conn: &mut SqliteConnection, version_id: &str) -> Result<()> {
        sqlx::query(include_str!("../queries/delete_verses_by_version.sql"))
            .bind(version_id)
            .execute(conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn delete_books_by_version(conn: &mut SqliteConnection, version_id: &str) -> Result<()> {
        sqlx::query(include_str!("../queries/delete_books_by_version.sql"))
            .bind(version_id)
            .execute(conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn put_version_on(conn: &mut SqliteConnection, version: &Version) -> Result<()> {
        let row = VersionRow::try_from(version)?;
        sqlx::query(include_str!("../queries/upsert_version.sql"))
            .bind(row.id)
            .bind(row.name)
            .bind(row.code)
            .bind(row.last_updated)
            .bind(row.size_bytes)
            .execute(conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn bulk_insert_books(conn: &mut SqliteConnection, books: &[Book]) -> Result<()> {
        for book in books {
            let row = BookRow::try_from(book)?;
            sqlx::query(include_str!("../queries/insert_book.sql"))
                .bind(row.key)
                .bind(row.version)
                .bind(row.book_id)
                .bind(row.name)
                .bind(row.abbreviation)
                .bind(row.chapter_count)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        Ok(())
    }

    async fn bulk_insert_verses(conn: &mut SqliteConnection, verses: &[Verse]) -> Result<()> {
        for verse in verses {
            let row = VerseRow::try_from(verse)?;
            sqlx::query(include_str!("../queries/insert_verse.sql"))
                .bind(row.key)
                .bind(row.version)
                .bind(row.book_id)
                .bind(row.book_name)
                .bind(row.chapter)
                .bind(row.verse)
                .bind(row.text)
                .execute(&mut *conn)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        Ok(())
    }

    /// Replace the store's state for a decoded version.
    ///
    /// One logical unit with respect to the version id: delete existing
    /// books/verses, write the version record, bulk-insert books, then
    /// insert verses in fixed-size batches with an `importing` progress
    /// event per batch. A failure mid-batch leaves earlier batches written;
    /// there is no automatic rollback across batches.
    ///
    /// No two imports for the *same* version id may run concurrently.
    #[instrument(skip_all, fields(version = %decoded.version.id, verses = decoded.verses.len()))]
    pub async fn replace_corpus(&self, decoded: &Decoded, on_progress: &mut dyn FnMut(Progress)) -> Result<()> {
        self.replace_corpus_batched(decoded, on_progress, BATCH_SIZE).await
    }

    /// [`replace_corpus`](Self::replace_corpus) with a configured verse
    /// batch size instead of the default.
    pub async fn replace_corpus_batched(
        &self,
        decoded: &Decoded,
        on_progress: &mut dyn FnMut(Progress),
        batch_size: usize,
    ) -> Result<()> {
        let version_id = decoded.version.id.as_str();
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        Self::delete_verses_by_version(&mut tx, version_id).await?;
        Self::delete_books_by_version(&mut tx, version_id).await?;
        Self::put_version_on(&mut tx, &decoded.version).await?;
        Self::bulk_insert_books(&mut tx, &decoded.books).await?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;

        let total = decoded.verses.len();
        let mut written = 0usize;
        for batch in decoded.verses.chunks(batch_size.max(1)) {
            let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
            Self::bulk_insert_verses(&mut tx, batch).await?;
            tx.commit().await.or_raise(|| ErrorKind::Database)?;
            written += batch.len();
            let percent = if total == 0 { 100 } else { (written * 100 / total) as u8 };
            on_progress(Progress::new(Phase::Importing, percent));
        }
        Ok(())
    }
}
