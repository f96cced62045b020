//! Generic tree values
//!
//! `Tree` is the only shape exchanged with the external executable. Records
//! are encoded into it before serialization and decoded out of it after the
//! response is parsed.

use crate::error::{BridgeError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Loosely-typed value tree with ordered maps
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tree {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered list of values
    List(Vec<Tree>),
    /// String keys in insertion order
    Map(IndexMap<String, Tree>),
}

impl Tree {
    pub fn map() -> Self {
        Tree::Map(IndexMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tree::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; floats with no fractional part are accepted when they
    /// fit in an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tree::Int(n) => Some(*n),
            Tree::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tree::Int(n) => Some(*n as f64),
            Tree::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tree]> {
        match self {
            Tree::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Tree>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Tree>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this is a map
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Tree::Null => "null",
            Tree::Bool(_) => "bool",
            Tree::Int(_) | Tree::Float(_) => "number",
            Tree::String(_) => "string",
            Tree::List(_) => "list",
            Tree::Map(_) => "map",
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| BridgeError::Decode(e.to_string()))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Bool(b)
    }
}

impl From<i64> for Tree {
    fn from(n: i64) -> Self {
        Tree::Int(n)
    }
}

impl From<f64> for Tree {
    fn from(f: f64) -> Self {
        Tree::Float(f)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::String(s.to_string())
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::String(s)
    }
}

impl<T: Into<Tree>> From<Vec<T>> for Tree {
    fn from(items: Vec<T>) -> Self {
        Tree::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Tree>> FromIterator<(K, V)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tree::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Tree {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Tree::Null => serializer.serialize_unit(),
            Tree::Bool(b) => serializer.serialize_bool(*b),
            Tree::Int(n) => serializer.serialize_i64(*n),
            Tree::Float(f) => serializer.serialize_f64(*f),
            Tree::String(s) => serializer.serialize_str(s),
            Tree::List(items) => items.serialize(serializer),
            Tree::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct TreeVisitor;

        impl<'de> Visitor<'de> for TreeVisitor {
            type Value = Tree;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar, list or map")
            }

            fn visit_unit<E>(self) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Tree, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Tree::deserialize(deserializer)
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                match i64::try_from(value) {
                    Ok(n) => Ok(Tree::Int(n)),
                    Err(_) => Ok(Tree::Float(value as f64)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Tree, E>
            where
                E: de::Error,
            {
                Ok(Tree::String(value))
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Tree, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Tree::List(items))
            }

            fn visit_map<V>(self, mut access: V) -> std::result::Result<Tree, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Tree>()? {
                    map.insert(key, value);
                }
                Ok(Tree::Map(map))
            }
        }

        deserializer.deserialize_any(TreeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_key_order() {
        let tree: Tree = [("zeta", Tree::Int(1)), ("alpha", Tree::Int(2))]
            .into_iter()
            .collect();

        let json = tree.to_json().unwrap();
        assert_eq!(json, br#"{"zeta":1,"alpha":2}"#);

        let decoded = Tree::from_json(&json).unwrap();
        let keys: Vec<_> = decoded.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn integers_stay_integers() {
        let tree = Tree::from_json(br#"{"revision": 1, "ratio": 0.5}"#).unwrap();
        assert_eq!(tree.get("revision"), Some(&Tree::Int(1)));
        assert_eq!(tree.get("ratio"), Some(&Tree::Float(0.5)));
        assert_eq!(tree.to_json().unwrap(), br#"{"revision":1,"ratio":0.5}"#);
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = Tree::from_json(b"not json").unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn accessors_reject_other_shapes() {
        let tree = Tree::from("text");
        assert_eq!(tree.as_str(), Some("text"));
        assert_eq!(tree.as_i64(), None);
        assert_eq!(tree.get("key"), None);
        assert_eq!(Tree::Float(3.0).as_i64(), Some(3));
        assert_eq!(Tree::Float(3.5).as_i64(), None);
    }
}
