//! Content fingerprint over assembled per-language trees.
//!
//! Used for external change detection (CI cache keys). Each requested
//! language is joined from local storage, canonically serialized, and the
//! concatenation in caller order is hashed with BLAKE3. Files outside the
//! requested languages never affect the digest.

use crate::error::SyncError;
use crate::snapshot::SnapshotAssembler;
use crate::store::{canonical_json, I18nStore};
use serde_json::Value;

/// Hex digest of the joined trees for `languages`, in the given order.
pub fn fingerprint(store: &I18nStore, languages: &[String]) -> Result<String, SyncError> {
    let assembler = SnapshotAssembler::new(store.clone())?;
    let mut hasher = blake3::Hasher::new();
    for language in languages {
        let tree = assembler.read_joined(language)?;
        hasher.update(canonical_json(&Value::Object(tree)).as_bytes());
    }
    Ok(hex::encode(hasher.finalize().as_bytes()))
}
