//! Field descriptor registry
//!
//! Built once from the provider's schemas and read-only afterwards.

use crate::operation::Surface;
use crate::schema::Schema;
use std::collections::HashMap;
use std::hash::Hash;

/// Visible top-level field of one resource or data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub sensitive: bool,
    pub deprecated: bool,
}

/// Descriptors keyed by resource name and surface
#[derive(Debug, Clone)]
pub struct Registry<K> {
    entries: HashMap<(K, Surface), Vec<FieldDescriptor>>,
}

impl<K: Copy + Eq + Hash> Registry<K> {
    pub fn builder() -> RegistryBuilder<K> {
        RegistryBuilder {
            entries: HashMap::new(),
        }
    }

    /// `None` when the resource has no schema on that surface
    pub fn descriptors(&self, name: K, surface: Surface) -> Option<&[FieldDescriptor]> {
        self.entries.get(&(name, surface)).map(Vec::as_slice)
    }
}

pub struct RegistryBuilder<K> {
    entries: HashMap<(K, Surface), Vec<FieldDescriptor>>,
}

impl<K: Copy + Eq + Hash> RegistryBuilder<K> {
    pub fn data_source(self, name: K, schema: &Schema) -> Self {
        self.register(name, Surface::DataSource, schema)
    }

    pub fn resource(self, name: K, schema: &Schema) -> Self {
        self.register(name, Surface::Resource, schema)
    }

    fn register(mut self, name: K, surface: Surface, schema: &Schema) -> Self {
        let descriptors = schema
            .attributes
            .iter()
            .map(|attr| FieldDescriptor {
                name: attr.name.clone(),
                sensitive: attr.sensitive,
                deprecated: attr.is_deprecated(),
            })
            .collect();
        self.entries.insert((name, surface), descriptors);
        self
    }

    pub fn build(self) -> Registry<K> {
        Registry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeBuilder, SchemaBuilder};

    fn key_schema() -> Schema {
        SchemaBuilder::new()
            .attribute(AttributeBuilder::string("application_key_id").computed().build())
            .attribute(
                AttributeBuilder::string("application_key")
                    .computed()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .optional()
                    .deprecated("use bucket_ids")
                    .build(),
            )
            .build()
    }

    #[test]
    fn descriptors_carry_schema_flags() {
        let registry = Registry::builder().resource("application_key", &key_schema()).build();

        let descriptors = registry
            .descriptors("application_key", Surface::Resource)
            .unwrap();
        assert_eq!(descriptors.len(), 3);
        assert!(!descriptors[0].sensitive);
        assert!(descriptors[1].sensitive);
        assert!(descriptors[2].deprecated);
    }

    #[test]
    fn surfaces_are_registered_separately() {
        let registry = Registry::builder()
            .data_source("application_key", &key_schema())
            .build();

        assert!(registry
            .descriptors("application_key", Surface::DataSource)
            .is_some());
        assert!(registry
            .descriptors("application_key", Surface::Resource)
            .is_none());
        assert!(registry.descriptors("bucket", Surface::DataSource).is_none());
    }
}
