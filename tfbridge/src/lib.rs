//! tfbridge - Terraform providers backed by an external executable
//!
//! Resource handlers build typed records, the bridge encodes them, runs the
//! executable once per operation, decodes its answer, and populates the
//! schema-bound attribute store Terraform sees as state.

// Core modules
pub mod case;
pub mod error;
pub mod record;
pub mod schema;
pub mod tree;

// Bridge modules
pub mod executable;
pub mod invoke;
pub mod operation;
pub mod populate;
pub mod redact;
pub mod registry;
pub mod store;

// Provider API modules
pub mod data_source;
pub mod diagnostic;
pub mod provider;
pub mod resource;

// Re-exports for convenience
pub use case::Casing;
pub use data_source::DataSource;
pub use diagnostic::Diagnostic;
pub use error::{BridgeError, Result};
pub use executable::{Bindings, Executable};
pub use invoke::Invoker;
pub use operation::{Operation, Surface};
pub use populate::populate;
pub use provider::Provider;
pub use record::{decode, encode, Decode, Encode};
pub use redact::redact;
pub use registry::{FieldDescriptor, Registry};
pub use resource::Resource;
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use store::{AttributePath, AttributeStore};
pub use tree::Tree;
