//! Format detection and dispatch.
//!
//! Raw bytes are classified by magic bytes first (ZIP container, gzip
//! stream), then as text: a leading `{` means JSON, anything else goes
//! through the XML tree parser, where the root tag picks the dialect
//! (`osis` vs. the simple book/chapter/verse family).

use crate::error::{ErrorKind, Result};
use crate::json;
use crate::models::Decoded;
use crate::progress::{Phase, Progress};
use crate::xml::{self, tree};
use exn::{OptionExt, ResultExt};
use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use tracing::instrument;
use zip::ZipArchive;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// A text document extracted from the raw bytes, with whatever filename we
/// know for it (archive entry name beats the outer hint).
struct Extracted {
    text: String,
    filename: Option<String>,
}

fn entry_is_corpus(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".json") || lower.ends_with(".xml")
}

fn extract_zip(bytes: &[u8]) -> Result<Extracted> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).or_raise(|| ErrorKind::DecodeFailure("corrupt ZIP archive".into()))?;
    // First entry named *.json or *.xml wins.
    let index = (0..archive.len())
        .find(|&index| archive.by_index(index).map(|entry| entry_is_corpus(entry.name())).unwrap_or(false))
        .ok_or_raise(|| ErrorKind::DecodeFailure("archive contains no JSON or XML entry".into()))?;
    let mut entry =
        archive.by_index(index).or_raise(|| ErrorKind::DecodeFailure("corrupt ZIP entry".into()))?;
    let filename = entry.name().to_string();
    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .or_raise(|| ErrorKind::DecodeFailure(format!("archive entry {filename} is not valid text")))?;
    Ok(Extracted { text, filename: Some(filename) })
}

fn extract_gzip(bytes: &[u8], filename: Option<&str>) -> Result<Extracted> {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .or_raise(|| ErrorKind::DecodeFailure("corrupt gzip stream".into()))?;
    let filename = filename.map(|name| name.trim_end_matches(".gz").to_string());
    Ok(Extracted { text, filename })
}

fn extract(bytes: &[u8], filename: Option<&str>) -> Result<Extracted> {
    if bytes.starts_with(&ZIP_MAGIC) {
        return extract_zip(bytes);
    }
    if bytes.starts_with(&GZIP_MAGIC) {
        return extract_gzip(bytes, filename);
    }
    Ok(Extracted {
        text: String::from_utf8_lossy(bytes).into_owned(),
        filename: filename.map(str::to_string),
    })
}

fn decode_text(text: &str, filename: Option<&str>) -> Result<Decoded> {
    if text.trim_start().starts_with('{') {
        return json::decode(text, filename);
    }
    let root = tree::parse(text)?;
    let size = text.len() as u64;
    match root.tag.as_str() {
        "osis" => xml::osis::decode(&root, filename, size),
        _ => xml::simple::decode(&root, filename, size),
    }
}

/// Decode raw source bytes into a canonical corpus.
///
/// `filename` is an optional hint used for version name/code resolution when
/// the source carries no metadata. Progress is reported at the `unzipping`
/// and `parsing` phase boundaries; the `importing` phase belongs to the
/// store.
#[instrument(skip(bytes, on_progress), fields(size = bytes.len(), filename))]
pub fn decode(bytes: &[u8], filename: Option<&str>, on_progress: &mut dyn FnMut(Progress)) -> Result<Decoded> {
    on_progress(Progress::new(Phase::Unzipping, 0));
    let extracted = extract(bytes, filename)?;
    on_progress(Progress::new(Phase::Unzipping, 100));
    on_progress(Progress::new(Phase::Parsing, 0));
    let decoded = decode_text(&extracted.text, extracted.filename.as_deref())?;
    if decoded.verses.is_empty() {
        exn::bail!(ErrorKind::EmptyCorpus);
    }
    on_progress(Progress::new(Phase::Parsing, 100));
    Ok(decoded)
}
