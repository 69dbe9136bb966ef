//! SQLite corpus store for imported Bible versions.
//!
//! This crate owns the persistent side of the engine: the versions, books,
//! and verses tables, the batched replace-on-import sequence, and verse
//! lookup for resolved references. Decoding lives in `lectern-decode`; this
//! crate only ever sees canonical records.
//!
//! # Architecture
//! - **Versions** are the unit of replacement: importing a version id wipes
//!   and rewrites everything under it. There is no merge.
//! - **Books** and **Verses** carry composite string keys
//!   (`version|bookId[|chapter|verse]`) mirroring their canonical identity.

mod db;
pub mod error;
mod import;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::import::import_corpus;
pub use crate::repo::Repository;
