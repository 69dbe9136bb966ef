//! The corpus ingestion entry point: raw bytes in, replaced version out.

use crate::error::{ErrorKind, Result};
use crate::{Database, Repository};
use exn::ResultExt;
use lectern_decode::{Progress, Version};
use tracing::instrument;

/// Decode raw source bytes and commit the result to the store, fully
/// replacing any prior data for the decoded version id.
///
/// Progress events are emitted at the `unzipping` and `parsing` phase
/// boundaries and once per verse batch during `importing`. Decode-phase
/// failures abort before any store mutation; a failure during the batched
/// verse insert leaves the store partially updated for that version id
/// (documented limitation, no automatic rollback across batches).
///
/// Imports for different version ids are independent; two concurrent
/// imports for the *same* id race their delete-then-insert sequences and
/// must be serialized by the caller.
#[instrument(skip(db, bytes, on_progress), fields(size = bytes.len(), filename))]
pub async fn import_corpus(
    db: &Database,
    bytes: &[u8],
    filename: Option<&str>,
    mut on_progress: impl FnMut(Progress),
) -> Result<Version> {
    let decoded =
        lectern_decode::decode(bytes, filename, &mut |progress| on_progress(progress)).or_raise(|| ErrorKind::Decode)?;
    let repo = Repository::from(db);
    repo.replace_corpus(&decoded, &mut on_progress).await?;
    Ok(decoded.version)
}
