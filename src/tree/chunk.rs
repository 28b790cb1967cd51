//! Chunk codec: bijective mapping between one tree and a set of named chunks.
//!
//! Chunk names come from an explicit [`ChunkDirectorySet`] computed once per
//! invocation by the caller (usually by listing the storage location). A
//! chunk name is matched against a *literal* top-level key of the tree, never
//! by dotted-path traversal: a directory literally named `a.b` does not
//! collide with the nested key `a.b` addressed through `tree::path`.
//!
//! Split processes names longest-first and removes each captured value from
//! the working tree so a shorter name cannot re-extract a value already
//! captured by a deeper chunk; whatever remains afterwards is the residual
//! root chunk. Join composes shortest-first, starting from the residual.

use super::Tree;
use std::collections::BTreeMap;

/// The chunk directory names in effect for one invocation.
///
/// Names are deduplicated and kept sorted so discovery order from the
/// filesystem never leaks into results; per-operation depth ordering is
/// derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkDirectorySet {
    names: Vec<String>,
}

impl ChunkDirectorySet {
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names ordered deepest (longest) first, for split.
    pub fn longest_first(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = self.names.iter().map(String::as_str).collect();
        ordered.sort_by_key(|name| std::cmp::Reverse(name.len()));
        ordered
    }

    /// Names ordered shallowest (shortest) first, for join.
    pub fn shortest_first(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = self.names.iter().map(String::as_str).collect();
        ordered.sort_by_key(|name| name.len());
        ordered
    }
}

/// Result of splitting one tree: a self-describing chunk per directory name
/// plus the residual root chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTree {
    /// Chunk content per directory name. A chunk whose key was present in
    /// the source tree holds `{name: value}`; a chunk whose key was absent
    /// is an empty tree, so join can tell absence apart from a present
    /// empty node.
    pub chunks: BTreeMap<String, Tree>,
    /// Whatever remains after all chunk keys were extracted.
    pub residual: Tree,
}

/// Partition `tree` by the directory names in `dirs`, deepest name first.
pub fn split(tree: Tree, dirs: &ChunkDirectorySet) -> SplitTree {
    let mut working = tree;
    let mut chunks = BTreeMap::new();
    for name in dirs.longest_first() {
        let mut chunk = Tree::new();
        if let Some(value) = working.remove(name) {
            chunk.insert(name.to_string(), value);
        }
        chunks.insert(name.to_string(), chunk);
    }
    SplitTree {
        chunks,
        residual: working,
    }
}

/// Reassemble a tree from the residual root chunk and per-name chunks,
/// shallowest name first. A missing chunk contributes nothing; a chunk that
/// does not contain its own name contributes nothing either.
pub fn join(residual: Tree, dirs: &ChunkDirectorySet, mut chunks: BTreeMap<String, Tree>) -> Tree {
    let mut tree = residual;
    for name in dirs.shortest_first() {
        let Some(mut chunk) = chunks.remove(name) else {
            continue;
        };
        if let Some(value) = chunk.remove(name) {
            tree.insert(name.to_string(), value);
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn dirs(names: &[&str]) -> ChunkDirectorySet {
        ChunkDirectorySet::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_split_extracts_chunk_and_residual() {
        let split_tree = split(
            tree(json!({"feature": {"hello": "hi"}, "common": {"x": "y"}})),
            &dirs(&["feature"]),
        );
        assert_eq!(
            split_tree.chunks["feature"],
            tree(json!({"feature": {"hello": "hi"}}))
        );
        assert_eq!(split_tree.residual, tree(json!({"common": {"x": "y"}})));
    }

    #[test]
    fn test_split_absent_key_yields_empty_chunk() {
        let split_tree = split(tree(json!({"common": 1})), &dirs(&["feature"]));
        assert_eq!(split_tree.chunks["feature"], Tree::new());
        assert_eq!(split_tree.residual, tree(json!({"common": 1})));
    }

    #[test]
    fn test_split_preserves_present_empty_node() {
        let split_tree = split(tree(json!({"feature": {}})), &dirs(&["feature"]));
        assert_eq!(split_tree.chunks["feature"], tree(json!({"feature": {}})));
        assert!(split_tree.residual.is_empty());
    }

    #[test]
    fn test_chunk_name_is_literal_not_dotted() {
        // A directory literally named "a.b" must not capture the nested key
        // a.b; the whole subtree stays with the "a" chunk.
        let split_tree = split(
            tree(json!({"a": {"b": {"c": 1}, "d": 2}})),
            &dirs(&["a", "a.b"]),
        );
        assert_eq!(split_tree.chunks["a.b"], Tree::new());
        assert_eq!(
            split_tree.chunks["a"],
            tree(json!({"a": {"b": {"c": 1}, "d": 2}}))
        );
        assert!(split_tree.residual.is_empty());
    }

    #[test]
    fn test_join_inverts_split() {
        let original = tree(json!({
            "a": {"b": {"c": 1}, "d": 2},
            "a.b": {"literal": true},
            "rest": "value"
        }));
        let set = dirs(&["a", "a.b"]);
        let split_tree = split(original.clone(), &set);
        let joined = join(split_tree.residual, &set, split_tree.chunks);
        assert_eq!(joined, original);
    }

    #[test]
    fn test_join_does_not_materialize_absent_keys() {
        let original = tree(json!({"common": 1}));
        let set = dirs(&["feature"]);
        let split_tree = split(original.clone(), &set);
        let joined = join(split_tree.residual, &set, split_tree.chunks);
        assert_eq!(joined, original);
    }

    #[test]
    fn test_join_tolerates_missing_chunks() {
        let set = dirs(&["feature"]);
        let joined = join(tree(json!({"x": 1})), &set, BTreeMap::new());
        assert_eq!(joined, tree(json!({"x": 1})));
    }

    #[test]
    fn test_zero_directories_degenerates_to_whole_tree() {
        let original = tree(json!({"a": {"b": 1}}));
        let set = ChunkDirectorySet::default();
        let split_tree = split(original.clone(), &set);
        assert!(split_tree.chunks.is_empty());
        assert_eq!(split_tree.residual, original);
        assert_eq!(join(split_tree.residual, &set, split_tree.chunks), original);
    }

    #[test]
    fn test_depth_ordering() {
        let set = dirs(&["a", "a.b", "ab"]);
        assert_eq!(set.longest_first(), vec!["a.b", "ab", "a"]);
        assert_eq!(set.shortest_first(), vec!["a", "ab", "a.b"]);
    }
}
