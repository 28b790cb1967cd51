//! Dotted-path addressing into a translation tree.
//!
//! Paths are dot-joined key sequences (`a.b.c`). Absence is a normal, silent
//! outcome: `get` returns `None` for any missing or non-tree intermediate and
//! `remove` no-ops when the parent cannot be resolved. `set` creates interior
//! nodes as needed and overwrites a scalar obstruction with a fresh tree, so
//! path assignment always wins.

use super::{empty_node, Tree};
use serde_json::Value;

/// Resolve `path` inside `tree`. Returns `None` if any intermediate segment
/// is missing, is not a tree, or the terminal key is absent.
pub fn get<'a>(tree: &'a Tree, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Assign `value` at `path`, creating interior trees for every non-terminal
/// segment. An existing non-tree intermediate is replaced wholesale.
pub fn set(mut tree: Tree, path: &str, value: Value) -> Tree {
    let segments: Vec<&str> = path.split('.').collect();
    set_in(&mut tree, &segments, value);
    tree
}

fn set_in(node: &mut Tree, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            node.insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            let entry = node.entry((*first).to_string()).or_insert_with(empty_node);
            if !entry.is_object() {
                *entry = empty_node();
            }
            if let Value::Object(next) = entry {
                set_in(next, rest, value);
            }
        }
    }
}

/// Delete the node at `path` if its parent resolves to a tree containing the
/// terminal key. Silently no-ops otherwise.
pub fn remove(mut tree: Tree, path: &str) -> Tree {
    let segments: Vec<&str> = path.split('.').collect();
    remove_in(&mut tree, &segments);
    tree
}

fn remove_in(node: &mut Tree, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            node.remove(*last);
        }
        [first, rest @ ..] => {
            if let Some(Value::Object(next)) = node.get_mut(*first) {
                remove_in(next, rest);
            }
        }
    }
}
