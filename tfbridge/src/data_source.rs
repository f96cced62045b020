//! DataSource trait and related types

use crate::diagnostic::Diagnostic;
use crate::schema::Schema;
use crate::store::AttributeStore;
use async_trait::async_trait;

/// Base trait for data sources - read is the only operation
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name should be constant (e.g., "b2_account_info")
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// MUST populate all attributes in response.state
    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

pub struct ReadDataSourceRequest {
    pub config: AttributeStore,
}

pub struct ReadDataSourceResponse {
    pub state: AttributeStore,
    pub diagnostics: Vec<Diagnostic>,
}
