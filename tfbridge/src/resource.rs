//! Resource trait and related types

use crate::diagnostic::Diagnostic;
use crate::schema::Schema;
use crate::store::AttributeStore;
use async_trait::async_trait;

/// Base trait for resources - implement CRUD operations
/// Type name must match the key used by the provider's factory
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name should be constant (e.g., "b2_bucket")
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// MUST populate all attributes in response.new_state (including computed)
    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse;

    /// Returns `None` as new state when the resource no longer exists
    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse;

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse;
}

pub struct CreateResourceRequest {
    pub config: AttributeStore,
}

pub struct CreateResourceResponse {
    pub new_state: AttributeStore,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ReadResourceRequest {
    pub current_state: AttributeStore,
    /// Set when the read directly follows a create
    pub is_new_resource: bool,
}

pub struct ReadResourceResponse {
    pub new_state: Option<AttributeStore>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct UpdateResourceRequest {
    pub prior_state: AttributeStore,
    pub config: AttributeStore,
}

pub struct UpdateResourceResponse {
    pub new_state: AttributeStore,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct DeleteResourceRequest {
    pub prior_state: AttributeStore,
}

pub struct DeleteResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}
