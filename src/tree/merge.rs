//! Right-biased deep merge of translation trees.
//!
//! Overlay wins everywhere it speaks. Tree-typed values on both sides merge
//! recursively key by key; any type mismatch (scalar vs tree, tree vs scalar)
//! resolves by replacing the base value wholesale. Tier cascades apply this
//! left to right in a fixed order; no general associativity is claimed.

use super::Tree;
use serde_json::Value;

/// Deep-merge `overlay` onto `base`. For every path present in the overlay,
/// the overlay's value wins.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// [`merge`] specialized to whole trees.
pub fn merge_trees(base: Tree, overlay: Tree) -> Tree {
    match merge(Value::Object(base), Value::Object(overlay)) {
        Value::Object(map) => map,
        // Object-object merge always yields an object.
        _ => Tree::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_precedence() {
        let all = json!({"x": 1, "y": 2});
        let main = json!({"y": 3, "z": 4});
        let current = json!({"y": 5});
        let merged = merge(merge(all, main), current);
        assert_eq!(merged, json!({"x": 1, "y": 5, "z": 4}));
    }

    #[test]
    fn test_recursive_union_of_keys() {
        let base = json!({"a": {"x": 1}, "keep": true});
        let overlay = json!({"a": {"y": 2}});
        assert_eq!(
            merge(base, overlay),
            json!({"a": {"x": 1, "y": 2}, "keep": true})
        );
    }

    #[test]
    fn test_type_mismatch_replaces_wholesale() {
        let base = json!({"a": {"deep": {"x": 1}}});
        let overlay = json!({"a": "flat"});
        assert_eq!(merge(base, overlay), json!({"a": "flat"}));

        let base = json!({"a": "flat"});
        let overlay = json!({"a": {"deep": 1}});
        assert_eq!(merge(base, overlay), json!({"a": {"deep": 1}}));
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let base = json!({"a": {"b": "v"}});
        assert_eq!(merge(base.clone(), json!({})), base);
    }
}
