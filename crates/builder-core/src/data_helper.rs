//! Navigating a JSON-like object graph using a simple string or path-piece sequence.

use serde_json::Value;

/// One piece of a parsed path: either a key into an object or an index into an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPiece {
    Key(String),
    Index(usize),
}

/// Follows `path` through `root` and returns the value it refers to, or `None` if
/// any piece along the way doesn't exist or doesn't match the expected container kind.
///
/// `path` is a `/`-separated string; pieces written as `[N]` are array indices,
/// everything else is an object key. Empty pieces (e.g. a leading `/`) are discarded.
pub fn find_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let pieces = parse_path(path);
    find_value_in(root, &pieces)
}

pub fn find_value_in<'a>(root: &'a Value, path: &[PathPiece]) -> Option<&'a Value> {
    let mut current = root;

    for piece in path {
        current = match piece {
            PathPiece::Index(index) => {
                let array = current.as_array()?;
                if *index >= array.len() {
                    return None;
                }
                &array[*index]
            }
            PathPiece::Key(key) => {
                let object = current.as_object()?;
                object.get(key)?
            }
        };
    }

    Some(current)
}

fn parse_path(path: &str) -> Vec<PathPiece> {
    path.split('/')
        .filter(|item| !item.is_empty())
        .map(|item| {
            if item.starts_with('[') && item.ends_with(']') {
                item[1..item.len() - 1]
                    .trim()
                    .parse::<usize>()
                    .map(PathPiece::Index)
                    .unwrap_or_else(|_| PathPiece::Key(item.to_string()))
            } else {
                PathPiece::Key(item.to_string())
            }
        })
        .collect()
}

pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// `true` for integer-valued JSON numbers. Unlike Python's `isinstance(x, int)`,
/// a JSON boolean is never an integer (`serde_json::Value` already keeps `Bool`
/// and `Number` distinct, so this holds without an explicit exclusion).
pub fn is_integer(value: &Value) -> bool {
    value.as_i64().is_some() || value.as_u64().is_some()
}

pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_nested_values() {
        let root = json!({"a": {"b": [1, 2, {"c": "hi"}]}});
        assert_eq!(find_value(&root, "a/b/[2]/c"), Some(&json!("hi")));
    }

    #[test]
    fn missing_path_is_none() {
        let root = json!({"a": 1});
        assert_eq!(find_value(&root, "a/b"), None);
        assert_eq!(find_value(&root, "z"), None);
    }

    #[test]
    fn out_of_range_index_is_none() {
        let root = json!({"a": [1]});
        assert_eq!(find_value(&root, "a/[5]"), None);
    }

    #[test]
    fn integer_excludes_bool_like_python() {
        assert!(is_integer(&json!(3)));
        assert!(!is_integer(&json!(3.5)));
    }
}
