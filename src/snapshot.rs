//! Snapshot assembly: the per-language tree that gets persisted or uploaded.
//!
//! Local reads join the residual root chunk with every discovered chunk file;
//! local writes slice a tree back into chunk files plus the residual. Remote
//! reads cascade three tiers through the merge engine: untagged content, then
//! the fallback (main) tag, then the current tag. The most specific tag wins,
//! so a feature tag overrides only the keys it defines and inherits the rest.

use crate::error::SyncError;
use crate::remote::RemoteClient;
use crate::store::I18nStore;
use crate::tree::chunk::{self, ChunkDirectorySet};
use crate::tree::merge::merge_trees;
use crate::tree::Tree;
use std::collections::BTreeMap;
use tracing::debug;

/// Assembles and slices per-language snapshots against one store, with the
/// chunk directory set discovered once at construction.
pub struct SnapshotAssembler {
    store: I18nStore,
    dirs: ChunkDirectorySet,
}

impl SnapshotAssembler {
    pub fn new(store: I18nStore) -> Result<Self, SyncError> {
        let dirs = store.chunk_directories()?;
        debug!(chunk_dirs = ?dirs.names(), root = %store.root().display(), "discovered chunk directories");
        Ok(Self { store, dirs })
    }

    pub fn chunk_directories(&self) -> &ChunkDirectorySet {
        &self.dirs
    }

    /// Join all local chunks for `language` into one tree. Missing files
    /// contribute nothing.
    pub fn read_joined(&self, language: &str) -> Result<Tree, SyncError> {
        let residual = self.store.read_language(language, None)?;
        let mut chunks = BTreeMap::new();
        for name in self.dirs.names() {
            chunks.insert(name.clone(), self.store.read_language(language, Some(name))?);
        }
        Ok(chunk::join(residual, &self.dirs, chunks))
    }

    /// Slice `tree` into the discovered chunk directories plus the residual
    /// root file for `language`.
    pub fn write_sliced(&self, language: &str, tree: Tree) -> Result<(), SyncError> {
        let split = chunk::split(tree, &self.dirs);
        for (name, chunk_tree) in &split.chunks {
            self.store.write_language(language, Some(name), chunk_tree)?;
        }
        self.store.write_language(language, None, &split.residual)
    }
}

/// Fetch and merge the three remote tiers for one language, sequentially.
///
/// Tier order is the contract: `merge(merge(all, main), current)`. The
/// current-tag fetch is skipped entirely when it equals the main tag; the
/// merge would be a no-op and the request would burn rate limit.
pub fn fetch_merged(
    client: &RemoteClient,
    language: &str,
    tag: &str,
    main_tag: &str,
) -> Result<Tree, SyncError> {
    let all = client.export(language, None)?;
    let main = client.export(language, Some(main_tag))?;
    let merged = merge_trees(all, main);
    if tag == main_tag {
        return Ok(merged);
    }
    let current = client.export(language, Some(tag))?;
    Ok(merge_trees(merged, current))
}
