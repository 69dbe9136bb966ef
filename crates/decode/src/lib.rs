//! Format detection and dialect decoding of Bible corpus sources.
//!
//! This crate turns heterogeneous source files (ZIP/gzip archives, JSON
//! documents, simple book/chapter/verse XML, OSIS XML with either
//! self-contained or milestone-style verses) into one canonical
//! [`Decoded`](models::Decoded) record set: a version, its books, and its
//! verses. The store crate commits that record set; this crate never touches
//! persistence.

pub mod consts;
mod detect;
pub mod error;
mod json;
pub mod models;
mod naming;
mod progress;
pub mod xml;

pub use crate::detect::decode;
pub use crate::models::{Book, Decoded, Verse, Version};
pub use crate::progress::{Phase, Progress};
