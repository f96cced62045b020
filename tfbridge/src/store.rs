//! Attribute store
//!
//! Schema-bound state of one resource or data source instance. Handlers read
//! configuration out of it and the populator writes decoded output into it.
//! Every write is checked against the declared attribute type.

use crate::case::Casing;
use crate::error::{BridgeError, Result};
use crate::record::{self, Decode};
use crate::schema::{AttributeType, Schema};
use crate::tree::Tree;
use indexmap::IndexMap;
use std::sync::Arc;

const ID_KEY: &str = "id";

/// Nested key/value state plus resource id
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStore {
    id: Option<String>,
    types: Arc<IndexMap<String, AttributeType>>,
    values: IndexMap<String, Tree>,
}

impl AttributeStore {
    pub fn new(schema: &Schema) -> Self {
        let types = schema
            .attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.r#type.clone()))
            .collect();
        Self {
            id: None,
            types: Arc::new(types),
            values: IndexMap::new(),
        }
    }

    /// Fresh store bound to the same schema
    pub fn empty_like(&self) -> Self {
        Self {
            id: None,
            types: Arc::clone(&self.types),
            values: IndexMap::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tree> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Tree::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Tree::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Tree::as_i64)
    }

    /// Write a top-level attribute
    pub fn set(&mut self, name: &str, value: Tree) -> Result<()> {
        let set_error = |message: String| BridgeError::SetField {
            field: name.to_string(),
            message,
        };

        let ty = self
            .types
            .get(name)
            .ok_or_else(|| set_error("attribute is not declared in the schema".to_string()))?;
        let stored = ty.conform(&value).map_err(set_error)?;
        self.values.insert(name.to_string(), stored);
        Ok(())
    }

    /// Decode one attribute into a typed record using state key names
    pub fn decode<T: Decode>(&self, name: &str) -> Result<T> {
        let value = self.get(name).unwrap_or(&Tree::Null);
        record::decode(value, Casing::Snake)
    }

    /// Decode the whole store into a typed record using state key names
    pub fn to_record<T: Decode>(&self) -> Result<T> {
        record::decode(&self.to_tree(), Casing::Snake)
    }

    pub fn get_path(&self, path: &AttributePath) -> Result<&Tree> {
        let (name, rest) = path.split_first()?;
        let mut current = self
            .values
            .get(name)
            .ok_or_else(|| BridgeError::Custom(format!("attribute '{}' not found", name)))?;

        for step in rest {
            current = match (current, step) {
                (Tree::Map(m), AttributePathStep::AttributeName(key))
                | (Tree::Map(m), AttributePathStep::ElementKeyString(key)) => {
                    m.get(key).ok_or_else(|| {
                        BridgeError::Custom(format!("attribute '{}' not found", key))
                    })?
                }
                (Tree::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    l.get(*idx).ok_or_else(|| {
                        BridgeError::Custom(format!("list index {} out of bounds", idx))
                    })?
                }
                _ => return Err(BridgeError::Custom("invalid path navigation".to_string())),
            };
        }

        Ok(current)
    }

    /// Write below a top-level attribute; the whole attribute is re-checked
    pub fn set_path(&mut self, path: &AttributePath, new_value: Tree) -> Result<()> {
        let (name, rest) = path.split_first()?;
        if rest.is_empty() {
            return self.set(name, new_value);
        }

        let mut root = self.values.get(name).cloned().unwrap_or(Tree::Null);
        let mut current = &mut root;
        for (idx, step) in rest.iter().enumerate() {
            if current.is_null() {
                *current = match step {
                    AttributePathStep::ElementKeyInt(_) => Tree::List(Vec::new()),
                    _ => Tree::map(),
                };
            }
            let slot = match (current, step) {
                (Tree::Map(m), AttributePathStep::AttributeName(key))
                | (Tree::Map(m), AttributePathStep::ElementKeyString(key)) => {
                    m.entry(key.clone()).or_insert(Tree::Null)
                }
                (Tree::List(l), AttributePathStep::ElementKeyInt(i)) => {
                    let len = l.len();
                    l.get_mut(*i).ok_or_else(|| {
                        BridgeError::Custom(format!("list index {} out of bounds ({})", i, len))
                    })?
                }
                _ => return Err(BridgeError::Custom("invalid path navigation".to_string())),
            };
            if idx == rest.len() - 1 {
                *slot = new_value;
                break;
            }
            current = slot;
        }

        self.set(name, root)
    }

    pub fn values(&self) -> &IndexMap<String, Tree> {
        &self.values
    }

    /// Whole state as one map, with the id under `id`
    pub fn to_tree(&self) -> Tree {
        let mut map = IndexMap::with_capacity(self.values.len() + 1);
        if let Some(id) = &self.id {
            map.insert(ID_KEY.to_string(), Tree::String(id.clone()));
        }
        map.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Tree::Map(map)
    }

    /// Terraform exchanges state as msgpack
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::encode::to_vec(&self.to_tree())
            .map_err(|e| BridgeError::Custom(format!("msgpack encoding failed: {}", e)))
    }

    /// Load msgpack state into a fresh store bound to this store's schema
    pub fn decode_msgpack(&self, data: &[u8]) -> Result<Self> {
        let mut store = self.empty_like();
        if data.is_empty() {
            return Ok(store);
        }

        let tree: Tree = rmp_serde::decode::from_slice(data)
            .map_err(|e| BridgeError::Decode(format!("msgpack decoding failed: {}", e)))?;
        let map = match tree {
            Tree::Map(map) => map,
            other => {
                return Err(BridgeError::Decode(format!(
                    "msgpack state must be a map, got {}",
                    other.type_name()
                )))
            }
        };

        for (key, value) in map {
            match (key.as_str(), value) {
                (ID_KEY, Tree::String(id)) if !store.is_declared(ID_KEY) => store.set_id(id),
                (_, value) => store.set(&key, value)?,
            }
        }
        Ok(store)
    }
}

/// AttributePath points at a value inside an [`AttributeStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![AttributePathStep::AttributeName(name.to_string())],
        }
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }

    pub fn index(mut self, idx: usize) -> Self {
        self.steps.push(AttributePathStep::ElementKeyInt(idx));
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.steps
            .push(AttributePathStep::ElementKeyString(key.to_string()));
        self
    }

    fn split_first(&self) -> Result<(&str, &[AttributePathStep])> {
        match self.steps.split_first() {
            Some((AttributePathStep::AttributeName(name), rest)) => Ok((name, rest)),
            _ => Err(BridgeError::Custom(
                "path must start with an attribute name".to_string(),
            )),
        }
    }
}

/// Individual step in an AttributePath
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePathStep {
    /// Attribute of an object
    AttributeName(String),
    /// Element of a map
    ElementKeyString(String),
    /// Element of a list
    ElementKeyInt(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeBuilder, SchemaBuilder};

    fn bucket_schema() -> Schema {
        SchemaBuilder::new()
            .attribute(AttributeBuilder::string("bucket_name").required().build())
            .attribute(AttributeBuilder::number("revision").computed().build())
            .attribute(
                AttributeBuilder::new(
                    "bucket_info",
                    AttributeType::map_of(AttributeType::String),
                )
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "allowed",
                    AttributeType::block(vec![
                        AttributeBuilder::string("bucket_id").computed().build(),
                        AttributeBuilder::string("bucket_name").computed().build(),
                    ]),
                )
                .computed()
                .build(),
            )
            .build()
    }

    #[test]
    fn set_and_get_declared_attribute() {
        let mut store = AttributeStore::new(&bucket_schema());
        store.set("bucket_name", Tree::from("x")).unwrap();
        store.set("revision", Tree::Int(1)).unwrap();

        assert_eq!(store.get_str("bucket_name"), Some("x"));
        assert_eq!(store.get_i64("revision"), Some(1));
        assert_eq!(store.get("bucket_info"), None);
    }

    #[test]
    fn set_rejects_undeclared_attribute() {
        let mut store = AttributeStore::new(&bucket_schema());
        let err = store.set("bucket_size", Tree::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error setting bucket_size: attribute is not declared in the schema"
        );
    }

    #[test]
    fn set_rejects_type_mismatch() {
        let mut store = AttributeStore::new(&bucket_schema());
        let err = store.set("revision", Tree::from("one")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error setting revision: expected number, got string"
        );
        assert!(store.get("revision").is_none());
    }

    #[test]
    fn nested_path_access() {
        let mut store = AttributeStore::new(&bucket_schema());
        store
            .set(
                "allowed",
                Tree::from_json(br#"[{"bucket_id":"","bucket_name":""}]"#).unwrap(),
            )
            .unwrap();

        let path = AttributePath::new("allowed").index(0).attribute("bucket_id");
        store.set_path(&path, Tree::from("b1")).unwrap();

        assert_eq!(store.get_path(&path).unwrap(), &Tree::from("b1"));
    }

    #[test]
    fn set_path_creates_missing_map_entries() {
        let mut store = AttributeStore::new(&bucket_schema());
        let path = AttributePath::new("bucket_info").key("env");
        store.set_path(&path, Tree::from("prod")).unwrap();

        assert_eq!(store.get_path(&path).unwrap(), &Tree::from("prod"));
    }

    #[test]
    fn set_path_rejects_out_of_bounds_index() {
        let mut store = AttributeStore::new(&bucket_schema());
        let path = AttributePath::new("allowed").index(0).attribute("bucket_id");
        assert!(store.set_path(&path, Tree::from("b1")).is_err());
    }

    #[test]
    fn store_decodes_into_record_by_state_names() {
        crate::record! {
            struct BucketConfig {
                bucket_name: String = "bucketName",
                bucket_info: IndexMap<String, String> = "bucketInfo",
                revision: i64 = "revision",
            }
        }

        let mut store = AttributeStore::new(&bucket_schema());
        store.set("bucket_name", Tree::from("x")).unwrap();
        store
            .set("bucket_info", [("env", "prod")].into_iter().collect())
            .unwrap();

        let config: BucketConfig = store.to_record().unwrap();
        assert_eq!(config.bucket_name, "x");
        assert_eq!(config.bucket_info.get("env").map(String::as_str), Some("prod"));
        assert_eq!(config.revision, 0);

        let info: IndexMap<String, String> = store.decode("bucket_info").unwrap();
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn msgpack_state_round_trips_with_id() {
        let mut store = AttributeStore::new(&bucket_schema());
        store.set_id("b1");
        store.set("bucket_name", Tree::from("x")).unwrap();
        store.set("revision", Tree::Int(3)).unwrap();

        let encoded = store.encode_msgpack().unwrap();
        let decoded = store.decode_msgpack(&encoded).unwrap();

        assert_eq!(decoded, store);
    }

    #[test]
    fn empty_msgpack_is_empty_state() {
        let store = AttributeStore::new(&bucket_schema());
        let decoded = store.decode_msgpack(&[]).unwrap();
        assert!(decoded.id().is_none());
        assert!(decoded.values().is_empty());
    }
}
