//! Schema types and builders
//!
//! Schemas describe every attribute a resource or data source exposes. They
//! feed the field descriptor registry and bind the attribute store, which
//! uses [`AttributeType::conform`] to check values before they are written.

use crate::tree::Tree;

/// AttributeType mirrors Terraform's type system
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Set(Box<AttributeType>),
    /// String keys only
    Map(Box<AttributeType>),
    /// Fixed structure; nested attributes keep their own flags
    Object(Vec<Attribute>),
}

impl AttributeType {
    /// Repeatable nested block, stored as a list of objects
    pub fn block(attributes: Vec<Attribute>) -> Self {
        AttributeType::List(Box::new(AttributeType::Object(attributes)))
    }

    pub fn list_of(element: AttributeType) -> Self {
        AttributeType::List(Box::new(element))
    }

    pub fn set_of(element: AttributeType) -> Self {
        AttributeType::Set(Box::new(element))
    }

    pub fn map_of(element: AttributeType) -> Self {
        AttributeType::Map(Box::new(element))
    }

    /// Check `value` against this type and return it in stored form
    ///
    /// Null is accepted everywhere. Object values keep only declared
    /// attributes, in declaration order; missing ones become null.
    pub fn conform(&self, value: &Tree) -> Result<Tree, String> {
        match (self, value) {
            (_, Tree::Null) => Ok(Tree::Null),
            (AttributeType::String, Tree::String(_))
            | (AttributeType::Bool, Tree::Bool(_))
            | (AttributeType::Number, Tree::Int(_))
            | (AttributeType::Number, Tree::Float(_)) => Ok(value.clone()),
            (AttributeType::List(element) | AttributeType::Set(element), Tree::List(items)) => {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| element.conform(item).map_err(|e| format!("[{i}]: {e}")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Tree::List)
            }
            (AttributeType::Map(element), Tree::Map(map)) => map
                .iter()
                .map(|(key, item)| {
                    element
                        .conform(item)
                        .map(|v| (key.clone(), v))
                        .map_err(|e| format!("{key}: {e}"))
                })
                .collect::<Result<_, _>>()
                .map(Tree::Map),
            (AttributeType::Object(attributes), Tree::Map(map)) => attributes
                .iter()
                .map(|attr| {
                    let item = map.get(&attr.name).unwrap_or(&Tree::Null);
                    attr.r#type
                        .conform(item)
                        .map(|v| (attr.name.clone(), v))
                        .map_err(|e| format!("{}: {e}", attr.name))
                })
                .collect::<Result<_, _>>()
                .map(Tree::Map),
            (expected, actual) => Err(format!(
                "expected {}, got {}",
                expected.type_name(),
                actual.type_name()
            )),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Bool => "bool",
            AttributeType::List(_) | AttributeType::Set(_) => "list",
            AttributeType::Map(_) | AttributeType::Object(_) => "map",
        }
    }
}

/// Attribute represents a single attribute of a schema or nested block
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub force_new: bool,
    /// Deprecation message shown to users
    pub deprecation: Option<String>,
}

impl Attribute {
    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }
}

/// Schema is returned by providers, resources and data sources
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// AttributeBuilder provides a fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                force_new: false,
                deprecation: None,
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (masked in logs)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Changing the value replaces the resource
    pub fn force_new(mut self) -> Self {
        self.attribute.force_new = true;
        self
    }

    pub fn deprecated(mut self, message: &str) -> Self {
        self.attribute.deprecation = Some(message.to_string());
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides a fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                description: String::new(),
                attributes: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.push(attr);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
