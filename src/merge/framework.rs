//! Deep merge of framework config fragments.
//!
//! # Merge Rules
//!
//! - Objects are merged recursively, new keys appended in fragment order
//! - Arrays are concatenated, then deduplicated by value (first seen wins)
//! - A null fragment leaves the existing value untouched
//! - Scalars in the fragment replace existing values
//!
//! Applying the same fragment twice yields the same result as applying it once.

use serde_json::Value;

/// Merge `fragment` into `existing`, returning the merged value.
pub fn merge_framework_config(existing: &Value, fragment: &Value) -> Value {
    let mut result = existing.clone();
    merge_into(&mut result, fragment);
    result
}

/// Merge `fragment` into `target` in place.
pub fn merge_into(target: &mut Value, fragment: &Value) {
    match (target, fragment) {
        (_, Value::Null) => {}

        (Value::Object(target_map), Value::Object(fragment_map)) => {
            for (key, value) in fragment_map {
                match target_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        if !value.is_null() {
                            target_map.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }

        (Value::Array(target_items), Value::Array(fragment_items)) => {
            let mut merged: Vec<Value> = Vec::with_capacity(target_items.len() + fragment_items.len());
            for item in target_items.iter().chain(fragment_items.iter()) {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            *target_items = merged;
        }

        (target, fragment) => *target = fragment.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn objects_merge_recursively() {
        let existing = json!({"theme": {"extend": {"colors": {"primary": "red"}}}});
        let fragment = json!({"theme": {"extend": {"colors": {"accent": "blue"}}}});

        let merged = merge_framework_config(&existing, &fragment);

        assert_eq!(
            merged,
            json!({"theme": {"extend": {"colors": {"primary": "red", "accent": "blue"}}}})
        );
    }

    #[test]
    fn arrays_concatenate_without_duplicates() {
        let existing = json!({"plugins": ["forms", "typography"]});
        let fragment = json!({"plugins": ["typography", "animate"]});

        let merged = merge_framework_config(&existing, &fragment);

        assert_eq!(merged["plugins"], json!(["forms", "typography", "animate"]));
    }

    #[test]
    fn array_dedup_uses_structural_equality() {
        let existing = json!({"content": [{"path": "a"}, {"path": "b"}]});
        let fragment = json!({"content": [{"path": "b"}, {"path": "c"}]});

        let merged = merge_framework_config(&existing, &fragment);

        assert_eq!(
            merged["content"],
            json!([{"path": "a"}, {"path": "b"}, {"path": "c"}])
        );
    }

    #[test]
    fn scalars_are_replaced() {
        let existing = json!({"darkMode": "media", "important": false});
        let fragment = json!({"darkMode": ["class"], "important": true});

        let merged = merge_framework_config(&existing, &fragment);

        assert_eq!(merged["darkMode"], json!(["class"]));
        assert_eq!(merged["important"], json!(true));
    }

    #[test]
    fn null_fragment_is_a_no_op() {
        let existing = json!({"prefix": "tw-"});
        let merged = merge_framework_config(&existing, &json!({"prefix": null, "extra": null}));
        assert_eq!(merged, existing);
    }

    #[test]
    fn new_keys_keep_fragment_order() {
        let merged = merge_framework_config(&json!({"b": 1}), &json!({"z": 1, "a": 2}));
        let keys: Vec<_> = merged.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "z", "a"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let base = json!({
            "darkMode": ["class"],
            "plugins": ["forms", "forms"],
            "theme": {"extend": {"borderRadius": {"lg": "var(--radius)"}}}
        });
        let fragment = json!({
            "plugins": ["animate", "forms"],
            "theme": {"extend": {"borderRadius": {"md": "calc(var(--radius) - 2px)"}}}
        });

        let once = merge_framework_config(&base, &fragment);
        let twice = merge_framework_config(&once, &fragment);

        assert_eq!(once, twice);
    }
}
