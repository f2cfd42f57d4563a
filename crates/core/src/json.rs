//! JSON value, path, and patch primitives
//!
//! `JsonValue` wraps `serde_json::Value` as the document type every TVar
//! holds. `JsonPath` is the path grammar from the path-normalization
//! component: dotted keys, bracketed indices, and the `$` root marker all
//! normalize to one canonical internal form. `set_at_path`/`get_at_path`
//! implement the JSON patch semantics: missing intermediate containers are
//! always created as objects, never arrays, regardless of the shape of the
//! segment that follows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A JSON document. Thin `serde_json::Value` wrapper so the rest of the
/// workspace has one canonical document type to pass around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct JsonValue(Value);

impl JsonValue {
    /// The JSON `null` value.
    pub const NULL: JsonValue = JsonValue(Value::Null);

    /// Wrap a `serde_json::Value`.
    pub fn new(value: Value) -> Self {
        JsonValue(value)
    }

    /// Unwrap into the underlying `serde_json::Value`.
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Borrow the underlying `serde_json::Value`.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Render as a compact JSON string.
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Render as a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }

    /// Approximate encoded size in bytes (via compact JSON encoding).
    pub fn size_bytes(&self) -> usize {
        self.0.to_string().len()
    }

    /// Maximum nesting depth of this document (`0` for a scalar).
    pub fn nesting_depth(&self) -> usize {
        fn depth(v: &Value) -> usize {
            match v {
                Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
                Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
                _ => 0,
            }
        }
        depth(&self.0)
    }
}

impl Default for JsonValue {
    fn default() -> Self {
        JsonValue(Value::Null)
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue(value)
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        value.0
    }
}

macro_rules! from_scalar {
    ($t:ty) => {
        impl From<$t> for JsonValue {
            fn from(v: $t) -> Self {
                JsonValue(Value::from(v))
            }
        }
    };
}

from_scalar!(bool);
from_scalar!(i64);
from_scalar!(i32);
from_scalar!(u64);
from_scalar!(u32);
from_scalar!(f64);
from_scalar!(String);

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue(Value::from(v))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(items: Vec<T>) -> Self {
        JsonValue(Value::Array(
            items.into_iter().map(|v| v.into().0).collect(),
        ))
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => JsonValue(Value::Null),
        }
    }
}

/// One component of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A normalized accessor path into a JSON document.
///
/// Accepts, on input, the root marker (empty string or `$`), dot-separated
/// keys, bracketed indices, and an optional `$`/`$.` prefix. A dot-segment
/// made entirely of digits (`.0`) is rewritten to the equivalent bracket
/// form (`[0]`) during parsing, so `a.2.b` and `a[2].b` normalize
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

/// Errors parsing a path string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// A `.` was not followed by a key (`a..b`, trailing `.`).
    #[error("empty key segment in path")]
    EmptyKey,
    /// A `[` was never closed.
    #[error("unclosed bracket in path")]
    UnclosedBracket,
    /// The contents of a `[...]` segment were not a valid index.
    #[error("invalid array index: {0}")]
    InvalidIndex(String),
    /// An unexpected character appeared where a segment was expected.
    #[error("unexpected character {0:?} in path")]
    UnexpectedChar(char),
}

fn strip_root_prefix(s: &str) -> &str {
    if s.is_empty() || s == "$" {
        return "";
    }
    if let Some(rest) = s.strip_prefix("$.") {
        return rest;
    }
    if let Some(rest) = s.strip_prefix('$') {
        return rest;
    }
    s
}

fn parse_segments(s: &str) -> Result<Vec<PathSegment>, PathParseError> {
    let body = strip_root_prefix(s);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = body.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut segments = Vec::new();

    while i < n {
        match chars[i] {
            '.' => {
                i += 1;
                let start = i;
                while i < n && chars[i] != '.' && chars[i] != '[' {
                    i += 1;
                }
                let key: String = chars[start..i].iter().collect();
                if key.is_empty() {
                    return Err(PathParseError::EmptyKey);
                }
                segments.push(key_or_index(key)?);
            }
            '[' => {
                i += 1;
                let start = i;
                while i < n && chars[i] != ']' {
                    i += 1;
                }
                if i >= n {
                    return Err(PathParseError::UnclosedBracket);
                }
                let digits: String = chars[start..i].iter().collect();
                let idx: usize = digits
                    .parse()
                    .map_err(|_| PathParseError::InvalidIndex(digits.clone()))?;
                segments.push(PathSegment::Index(idx));
                i += 1;
            }
            _ => {
                let start = i;
                while i < n && chars[i] != '.' && chars[i] != '[' {
                    i += 1;
                }
                let key: String = chars[start..i].iter().collect();
                if key.is_empty() {
                    return Err(PathParseError::UnexpectedChar(chars[i]));
                }
                segments.push(PathSegment::Key(key));
            }
        }
    }

    Ok(segments)
}

/// A bare dot-segment made entirely of digits is an index, per spec's
/// `.0` → `[0]` rewrite rule; anything else is a key.
fn key_or_index(key: String) -> Result<PathSegment, PathParseError> {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        let idx: usize = key
            .parse()
            .map_err(|_| PathParseError::InvalidIndex(key.clone()))?;
        Ok(PathSegment::Index(idx))
    } else {
        Ok(PathSegment::Key(key))
    }
}

impl JsonPath {
    /// The root path (empty segment list).
    pub fn root() -> Self {
        JsonPath {
            segments: Vec::new(),
        }
    }

    /// Build a path from an explicit segment list.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        JsonPath { segments }
    }

    /// The segments making up this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments (`0` for root).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if this path is the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment, returning the extended path.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment, returning the extended path.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Append a key segment in place.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Append an index segment in place.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// The last segment, or `None` for root.
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The path with its last segment removed (`root()` for a 1-segment path).
    pub fn parent(&self) -> JsonPath {
        let mut segments = self.segments.clone();
        segments.pop();
        JsonPath { segments }
    }

    /// Render the canonical form: `$` followed by each segment's `Display`.
    pub fn to_path_string(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.segments {
            out.push_str(&seg.to_string());
        }
        out
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JsonPath {
            segments: parse_segments(s)?,
        })
    }
}

/// Errors navigating a document with a [`JsonPath`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPathError {
    /// The path expected a container of one shape but found another.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the path expected to find.
        expected: &'static str,
        /// What was actually there.
        found: &'static str,
    },
    /// An array index was out of range.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The array's actual length.
        len: usize,
    },
    /// The path traversed through a missing key or index.
    #[error("path not found")]
    NotFound,
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Project `path` out of `root`. Returns `None` if the path traverses
/// through a missing key or an out-of-range index.
pub fn get_at_path<'a>(root: &'a JsonValue, path: &JsonPath) -> Option<&'a JsonValue> {
    if path.is_root() {
        return Some(root);
    }
    let mut current = &root.0;
    for seg in &path.segments {
        match (seg, current) {
            (PathSegment::Key(k), Value::Object(map)) => current = map.get(k)?,
            (PathSegment::Index(i), Value::Array(arr)) => current = arr.get(*i)?,
            // An index segment may address an object if that's what a prior
            // `set_at_path` vivified (or found) in that position — see
            // `set_at_path`'s own handling of `PathSegment::Index`.
            (PathSegment::Index(i), Value::Object(map)) => current = map.get(&i.to_string())?,
            _ => return None,
        }
    }
    Some(wrap_ref(current))
}

/// Reborrow a `&serde_json::Value` as `&JsonValue`.
///
/// `JsonValue` is `#[repr(transparent)]` around `Value` with no other
/// fields, so this is a same-module reinterpretation rather than a cast
/// across unrelated types.
fn wrap_ref(v: &Value) -> &JsonValue {
    unsafe { &*(v as *const Value as *const JsonValue) }
}

/// Mutable variant of [`get_at_path`], returning the raw `serde_json::Value`
/// node so callers can mutate scalars in place without reallocating.
pub fn get_at_path_mut<'a>(root: &'a mut JsonValue, path: &JsonPath) -> Option<&'a mut Value> {
    if path.is_root() {
        return Some(&mut root.0);
    }
    let mut current = &mut root.0;
    for seg in &path.segments {
        match (seg, current) {
            (PathSegment::Key(k), Value::Object(map)) => current = map.get_mut(k)?,
            (PathSegment::Index(i), Value::Array(arr)) => current = arr.get_mut(*i)?,
            (PathSegment::Index(i), Value::Object(map)) => current = map.get_mut(&i.to_string())?,
            _ => return None,
        }
    }
    Some(current)
}

/// Apply `set(doc, path, value)` per the JSON patch semantics: the root
/// path replaces the whole document; any other path walks to its parent,
/// creating missing intermediate containers as empty **objects** regardless
/// of whether the next segment looks like a key or an index, then assigns
/// `value` at the terminal segment. An index segment addressing an object
/// (because that's what the walk vivified, or because one was already
/// there) writes its stringified index as an object key rather than
/// requiring a real array; a genuine array at that position still gets real
/// array semantics (in-bounds overwrite or exactly-one-past-the-end push).
pub fn set_at_path(
    root: &mut JsonValue,
    path: &JsonPath,
    value: JsonValue,
) -> Result<(), JsonPathError> {
    if path.is_root() {
        *root = value;
        return Ok(());
    }

    let (parent_segments, last) = path.segments.split_at(path.segments.len() - 1);
    let last = &last[0];

    let mut current = &mut root.0;
    for seg in parent_segments {
        current = match seg {
            PathSegment::Key(k) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let map = current
                    .as_object_mut()
                    .ok_or_else(|| JsonPathError::TypeMismatch {
                        expected: "object",
                        found: value_type_name(current),
                    })?;
                map.entry(k.clone())
                    .or_insert_with(|| Value::Object(Map::new()))
            }
            PathSegment::Index(i) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Array(arr) => {
                        if *i >= arr.len() {
                            return Err(JsonPathError::IndexOutOfBounds {
                                index: *i,
                                len: arr.len(),
                            });
                        }
                        let slot = &mut arr[*i];
                        if slot.is_null() {
                            *slot = Value::Object(Map::new());
                        }
                        slot
                    }
                    // A missing intermediate is always created as an object
                    // (never an array), so an index segment against one
                    // addresses it by its stringified index as an object key.
                    Value::Object(map) => map
                        .entry(i.to_string())
                        .or_insert_with(|| Value::Object(Map::new())),
                    _ => {
                        return Err(JsonPathError::TypeMismatch {
                            expected: "array or object",
                            found: value_type_name(current),
                        })
                    }
                }
            }
        };
    }

    match last {
        PathSegment::Key(k) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let map = current
                .as_object_mut()
                .ok_or_else(|| JsonPathError::TypeMismatch {
                    expected: "object",
                    found: value_type_name(current),
                })?;
            map.insert(k.clone(), value.0);
        }
        PathSegment::Index(i) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Array(arr) => {
                    if *i < arr.len() {
                        arr[*i] = value.0;
                    } else if *i == arr.len() {
                        arr.push(value.0);
                    } else {
                        return Err(JsonPathError::IndexOutOfBounds {
                            index: *i,
                            len: arr.len(),
                        });
                    }
                }
                // Same "missing intermediates are objects" rule applies at
                // the terminal segment: indexing into a freshly-created (or
                // pre-existing) object writes the stringified index as a key
                // rather than requiring a real array.
                Value::Object(map) => {
                    map.insert(i.to_string(), value.0);
                }
                _ => {
                    return Err(JsonPathError::TypeMismatch {
                        expected: "array or object",
                        found: value_type_name(current),
                    })
                }
            }
        }
    }

    Ok(())
}

/// One entry of an ordered patch plan: write `value` at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOp {
    /// Where to write.
    pub path: JsonPath,
    /// What to write.
    pub value: JsonValue,
}

impl PatchOp {
    /// Build a patch writing `value` at `path`.
    pub fn new(path: JsonPath, value: JsonValue) -> Self {
        PatchOp { path, value }
    }
}

/// Apply an ordered list of patches to `root`, in order. Later patches may
/// observe the effect of earlier ones.
pub fn apply_patches(root: &mut JsonValue, patches: &[PatchOp]) -> Result<(), JsonPathError> {
    for patch in patches {
        set_at_path(root, &patch.path, patch.value.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> JsonValue {
        json.parse().unwrap()
    }

    // -- JsonValue --

    #[test]
    fn json_value_roundtrips_through_string() {
        let v = doc(r#"{"a":1,"b":[1,2,3]}"#);
        let s = v.to_json_string();
        let v2: JsonValue = s.parse().unwrap();
        assert_eq!(v, v2);
    }

    #[test]
    fn nesting_depth_of_scalar_is_zero() {
        assert_eq!(JsonValue::from(1i64).nesting_depth(), 0);
    }

    #[test]
    fn nesting_depth_counts_containers() {
        let v = doc(r#"{"a":{"b":[1,2]}}"#);
        assert_eq!(v.nesting_depth(), 3);
    }

    // -- JsonPath parsing / normalization --

    #[test]
    fn empty_and_dollar_are_root() {
        assert!("".parse::<JsonPath>().unwrap().is_root());
        assert!("$".parse::<JsonPath>().unwrap().is_root());
    }

    #[test]
    fn dot_path_parses_keys() {
        let p: JsonPath = "a.b.c".parse().unwrap();
        assert_eq!(
            p.segments(),
            &[
                PathSegment::Key("a".into()),
                PathSegment::Key("b".into()),
                PathSegment::Key("c".into())
            ]
        );
    }

    #[test]
    fn bracket_path_parses_indices() {
        let p: JsonPath = "[0]".parse().unwrap();
        assert_eq!(p.segments(), &[PathSegment::Index(0)]);

        let p: JsonPath = "foo[2]".parse().unwrap();
        assert_eq!(
            p.segments(),
            &[PathSegment::Key("foo".into()), PathSegment::Index(2)]
        );
    }

    #[test]
    fn dollar_prefix_is_stripped() {
        let with_prefix: JsonPath = "$.a.b".parse().unwrap();
        let without_prefix: JsonPath = "a.b".parse().unwrap();
        assert_eq!(with_prefix, without_prefix);
    }

    #[test]
    fn dotted_digit_segment_normalizes_like_bracket_index() {
        let dotted: JsonPath = "a.2.b".parse().unwrap();
        let bracketed: JsonPath = "a[2].b".parse().unwrap();
        assert_eq!(dotted, bracketed);
        assert_eq!(
            dotted.segments(),
            &[
                PathSegment::Key("a".into()),
                PathSegment::Index(2),
                PathSegment::Key("b".into())
            ]
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let p: JsonPath = "a.b[3].c".parse().unwrap();
        let again: JsonPath = p.to_path_string().parse().unwrap();
        assert_eq!(p, again);
    }

    #[test]
    fn canonical_form_uses_dot_and_bracket() {
        let p: JsonPath = "a.b[3]".parse().unwrap();
        assert_eq!(p.to_path_string(), "$.a.b[3]");
    }

    #[test]
    fn unclosed_bracket_is_an_error() {
        let err = "foo[1".parse::<JsonPath>().unwrap_err();
        assert_eq!(err, PathParseError::UnclosedBracket);
    }

    #[test]
    fn trailing_dot_is_an_error() {
        let err = "foo.".parse::<JsonPath>().unwrap_err();
        assert_eq!(err, PathParseError::EmptyKey);
    }

    #[test]
    fn invalid_index_is_an_error() {
        let err = "[abc]".parse::<JsonPath>().unwrap_err();
        assert!(matches!(err, PathParseError::InvalidIndex(_)));
    }

    #[test]
    fn parent_of_single_segment_is_root() {
        let p: JsonPath = "a".parse().unwrap();
        assert!(p.parent().is_root());
    }

    // -- get_at_path / set_at_path --

    #[test]
    fn get_at_root_returns_whole_document() {
        let v = doc(r#"{"a":1}"#);
        let got = get_at_path(&v, &JsonPath::root()).unwrap();
        assert_eq!(got, &v);
    }

    #[test]
    fn get_at_missing_key_is_none() {
        let v = doc(r#"{"a":1}"#);
        let path: JsonPath = "b".parse().unwrap();
        assert!(get_at_path(&v, &path).is_none());
    }

    #[test]
    fn get_array_index() {
        let v = doc(r#"["A","B","C"]"#);
        let path: JsonPath = "[1]".parse().unwrap();
        assert_eq!(get_at_path(&v, &path).unwrap().as_value(), &Value::from("B"));
    }

    #[test]
    fn set_at_root_replaces_whole_document() {
        let mut v = doc(r#"{"a":1}"#);
        set_at_path(&mut v, &JsonPath::root(), doc(r#"{"b":2}"#)).unwrap();
        assert_eq!(v, doc(r#"{"b":2}"#));
    }

    #[test]
    fn set_creates_missing_intermediate_as_object_for_dotted_key_path() {
        let mut v = JsonValue::default();
        let path: JsonPath = "a.b".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from(1i64)).unwrap();
        assert_eq!(v, doc(r#"{"a":{"b":1}}"#));
    }

    #[test]
    fn set_index_against_missing_intermediate_creates_object_not_array() {
        // Per spec: missing intermediates are always objects, regardless of
        // whether the next segment looks like a key or an index — an index
        // segment against a missing/vivified slot addresses it by its
        // stringified index rather than requiring a real array.
        let mut v = JsonValue::default();
        let path: JsonPath = "a[0]".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from(1i64)).unwrap();
        assert_eq!(v, doc(r#"{"a":{"0":1}}"#));
    }

    #[test]
    fn set_index_against_missing_intermediate_is_readable_back_by_the_same_path() {
        let mut v = JsonValue::default();
        let path: JsonPath = "a[0]".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from(1i64)).unwrap();
        assert_eq!(get_at_path(&v, &path), Some(&JsonValue::from(1i64)));
    }

    #[test]
    fn set_bare_index_against_null_root_creates_object_not_array() {
        let mut v = JsonValue::default();
        let path: JsonPath = "[0]".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from("x")).unwrap();
        assert_eq!(v, doc(r#"{"0":"x"}"#));
    }

    #[test]
    fn set_existing_array_element() {
        let mut v = doc(r#"["A","B","C"]"#);
        let path: JsonPath = "[1]".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from("BB")).unwrap();
        assert_eq!(v, doc(r#"["A","BB","C"]"#));
    }

    #[test]
    fn set_can_append_one_past_array_end() {
        let mut v = doc(r#"["A"]"#);
        let path: JsonPath = "[1]".parse().unwrap();
        set_at_path(&mut v, &path, JsonValue::from("B")).unwrap();
        assert_eq!(v, doc(r#"["A","B"]"#));
    }

    #[test]
    fn set_past_array_end_is_out_of_bounds() {
        let mut v = doc(r#"["A"]"#);
        let path: JsonPath = "[5]".parse().unwrap();
        let err = set_at_path(&mut v, &path, JsonValue::from("X")).unwrap_err();
        assert!(matches!(err, JsonPathError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn apply_patches_in_order_lets_later_observe_earlier() {
        let mut v = JsonValue::default();
        let patches = vec![
            PatchOp::new("alice.balance".parse().unwrap(), JsonValue::from(70i64)),
            PatchOp::new("alice.txs".parse().unwrap(), JsonValue::from(vec!["sent 30"])),
        ];
        apply_patches(&mut v, &patches).unwrap();
        assert_eq!(v, doc(r#"{"alice":{"balance":70,"txs":["sent 30"]}}"#));
    }
}
