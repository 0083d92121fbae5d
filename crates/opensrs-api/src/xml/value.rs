// OPS data tree
//
// Every OPS payload is a tree of scalars, associative arrays (`dt_assoc`)
// and ordered arrays (`dt_array`). Requests are built as `OpsValue`s and
// responses are parsed into them before typed extraction.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// One node of an OPS `data_block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpsValue {
    Scalar(String),
    Assoc(IndexMap<String, OpsValue>),
    Array(Vec<OpsValue>),
}

impl OpsValue {
    /// An empty `dt_assoc`.
    pub fn assoc() -> Self {
        Self::Assoc(IndexMap::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_assoc(&self) -> Option<&IndexMap<String, OpsValue>> {
        match self {
            Self::Assoc(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[OpsValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Child of a `dt_assoc` by key.
    pub fn get(&self, key: &str) -> Option<&OpsValue> {
        self.as_assoc().and_then(|map| map.get(key))
    }

    /// Trimmed scalar child of a `dt_assoc`, `None` when absent or blank.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(OpsValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Scalar child exactly as sent, `None` when absent or empty.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(OpsValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Scalar child parsed as a number.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get_str(key).and_then(|s| s.parse().ok())
    }

    /// OPS booleans are `"1"` / `"0"`.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get_str(key).map(|s| s == "1")
    }

    /// Walk nested `dt_assoc`s.
    pub fn path(&self, keys: &[&str]) -> Option<&OpsValue> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Elements of an array child; an absent key is an empty list.
    pub fn items(&self, key: &str) -> &[OpsValue] {
        self.get(key).and_then(OpsValue::as_array).unwrap_or(&[])
    }
}

impl From<&str> for OpsValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_owned())
    }
}

impl From<String> for OpsValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<&String> for OpsValue {
    fn from(s: &String) -> Self {
        Self::Scalar(s.clone())
    }
}

impl From<bool> for OpsValue {
    fn from(b: bool) -> Self {
        Self::Scalar(if b { "1" } else { "0" }.to_owned())
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for OpsValue {
            fn from(n: $t) -> Self {
                Self::Scalar(n.to_string())
            }
        })*
    };
}

scalar_from_int!(u16, u32, u64, i32, usize);

impl From<Vec<OpsValue>> for OpsValue {
    fn from(items: Vec<OpsValue>) -> Self {
        Self::Array(items)
    }
}

impl From<IndexMap<String, OpsValue>> for OpsValue {
    fn from(map: IndexMap<String, OpsValue>) -> Self {
        Self::Assoc(map)
    }
}

impl Serialize for OpsValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::Assoc(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Self::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for v in items {
                    out.serialize_element(v)?;
                }
                out.end()
            }
        }
    }
}

// ── Builder ──────────────────────────────────────────────────────────

/// Fluent builder for `dt_assoc` nodes, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct Assoc(IndexMap<String, OpsValue>);

impl Assoc {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item(mut self, key: &str, value: impl Into<OpsValue>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Insert only when `value` is present.
    #[must_use]
    pub fn opt_item<V: Into<OpsValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.item(key, v),
            None => self,
        }
    }

    pub fn build(self) -> OpsValue {
        OpsValue::Assoc(self.0)
    }
}

impl From<Assoc> for OpsValue {
    fn from(a: Assoc) -> Self {
        a.build()
    }
}
