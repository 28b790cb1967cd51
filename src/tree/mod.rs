//! Hierarchical translation tree: dotted-path addressing, chunk codec, and
//! deep merge.
//!
//! A [`Tree`] is one language's translations as a nested key/value mapping.
//! Trees are owned values passed between stages; `set`/`remove` and the chunk
//! codec take a tree in and hand a tree back rather than mutating shared
//! state.

pub mod chunk;
pub mod merge;
pub mod path;

/// Nested key -> value mapping for one language.
///
/// Leaves are translated strings; interior nodes are sub-trees. The default
/// serde_json map is backed by a BTreeMap, so keys are always sorted and the
/// canonical serialization falls out of ordinary printing.
pub type Tree = serde_json::Map<String, serde_json::Value>;

/// Fresh empty interior node.
pub fn empty_node() -> serde_json::Value {
    serde_json::Value::Object(Tree::new())
}
