//! On-disk layout for chunked i18n files.
//!
//! The store rooted at `i18n_dir` holds, for each language `L`, the residual
//! root chunk at `i18n_dir/L.json` and one chunk per discovered directory at
//! `i18n_dir/<dir>/L.json`. Files are UTF-8 JSON objects, 2-space indented,
//! keys sorted, non-ASCII characters written verbatim. A missing language or
//! chunk file reads as an empty tree; it is never an error.

use crate::error::SyncError;
use crate::tree::chunk::ChunkDirectorySet;
use crate::tree::Tree;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Handle on one `i18n_dir` storage root.
#[derive(Debug, Clone)]
pub struct I18nStore {
    root: PathBuf,
}

impl I18nStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover the chunk directory set by listing immediate subdirectories
    /// of the storage root. Computed once per invocation by the caller.
    pub fn chunk_directories(&self) -> Result<ChunkDirectorySet, SyncError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(ChunkDirectorySet::new(names))
    }

    /// Path of one language file, either in a chunk directory or at the root
    /// (the residual chunk).
    pub fn language_file(&self, language: &str, dir: Option<&str>) -> PathBuf {
        let file_name = format!("{language}.json");
        match dir {
            Some(dir) => self.root.join(dir).join(file_name),
            None => self.root.join(file_name),
        }
    }

    /// Read one language file. A missing file is an empty tree.
    pub fn read_language(&self, language: &str, dir: Option<&str>) -> Result<Tree, SyncError> {
        let path = self.language_file(language, dir);
        if !path.is_file() {
            return Ok(Tree::new());
        }
        read_tree(&path)
    }

    /// Write one language file, creating the chunk directory if needed.
    pub fn write_language(
        &self,
        language: &str,
        dir: Option<&str>,
        tree: &Tree,
    ) -> Result<(), SyncError> {
        write_tree(&self.language_file(language, dir), tree)
    }
}

/// Read a JSON object file strictly: missing or malformed files and non-object
/// top levels are errors. Used for explicit `--file` arguments.
pub fn read_tree(path: &Path) -> Result<Tree, SyncError> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(SyncError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Write a tree to `path` in canonical form, creating parent directories.
pub fn write_tree(path: &Path, tree: &Tree) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = canonical_json(&Value::Object(tree.clone()));
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Canonical serialization: 2-space indent, sorted keys (the map type keeps
/// them sorted), non-ASCII preserved. All change detection and all on-disk
/// content go through this one form.
pub fn canonical_json(value: &Value) -> String {
    // Serializing a Value to a string cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}
