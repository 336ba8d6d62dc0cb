//! Pure helpers over JSON-like values.
//!
//! These are synchronous boundary collaborators of the fan-out core:
//! nested key-path access over a value tree and element repetition.

use serde_json::Value;

use crate::error::{Result, VolleyError};

/// Walk `path` through nested objects and return the value at the end.
///
/// # Errors
/// Returns `LookupFailure` naming the first key that is absent (or that
/// is applied to a non-object value).
///
/// # Example
/// ```ignore
/// let nested = serde_json::json!({"a": {"b": 2}});
/// assert_eq!(access_nested(&nested, &["a", "b"])?, &serde_json::json!(2));
/// ```
pub fn access_nested<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key).ok_or_else(|| VolleyError::LookupFailure {
            key: (*key).to_string(),
        })?;
    }
    Ok(current)
}

/// Return the value at `key`, or `default` if the key is absent.
pub fn value_or_default<'a>(value: &'a Value, key: &str, default: &'a Value) -> &'a Value {
    value.get(key).unwrap_or(default)
}

/// Repeat each element of `items` `factor` times, preserving order.
pub fn repeat_elements<T: Clone>(items: &[T], factor: usize) -> Vec<T> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat_n(item.clone(), factor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_access_nested_single_key() {
        let nested = json!({"a": 1});
        assert_eq!(access_nested(&nested, &["a"]).unwrap(), &json!(1));
    }

    #[test]
    fn test_access_nested_returns_subtree() {
        let nested = json!({"a": {"b": 2}});
        assert_eq!(access_nested(&nested, &["a"]).unwrap(), &json!({"b": 2}));
    }

    #[test]
    fn test_access_nested_two_levels() {
        let nested = json!({"a": {"b": 2}});
        assert_eq!(access_nested(&nested, &["a", "b"]).unwrap(), &json!(2));
    }

    #[test]
    fn test_access_nested_missing_key_names_the_key() {
        let err = access_nested(&json!({}), &["a"]).unwrap_err();
        assert_eq!(err.to_string(), "Key 'a' not found in nested map");
    }

    #[test]
    fn test_access_nested_key_into_scalar_fails() {
        let err = access_nested(&json!({"a": 1}), &["a", "b"]).unwrap_err();
        assert_eq!(err.to_string(), "Key 'b' not found in nested map");
    }

    #[test]
    fn test_value_or_default() {
        let map = json!({"a": 1});
        let fallback = json!(99);
        assert_eq!(value_or_default(&map, "a", &fallback), &json!(1));
        assert_eq!(value_or_default(&map, "b", &fallback), &json!(99));
    }

    #[test]
    fn test_repeat_elements_doubles_by_default_factor() {
        assert_eq!(
            repeat_elements(&[12, 72, 91], 2),
            vec![12, 12, 72, 72, 91, 91]
        );
    }

    #[test]
    fn test_repeat_elements_triples() {
        assert_eq!(repeat_elements(&[12, 72, 91], 3).len(), 9);
    }

    #[test]
    fn test_repeat_elements_zero_factor_is_empty() {
        assert!(repeat_elements(&[1, 2, 3], 0).is_empty());
    }
}
