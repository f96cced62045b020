use crate::data_source::DataSource;
use crate::diagnostic::Diagnostic;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::store::AttributeStore;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait Provider: Send + Sync {
    fn schema(&self) -> Schema;

    /// Called once before any resource or data source is created
    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse;

    async fn create_resource(&self, type_name: &str) -> Result<Box<dyn Resource>>;

    async fn create_data_source(&self, type_name: &str) -> Result<Box<dyn DataSource>>;

    fn resource_schemas(&self) -> HashMap<String, Schema>;

    fn data_source_schemas(&self) -> HashMap<String, Schema>;
}

pub struct ConfigureProviderRequest {
    pub terraform_version: String,
    pub config: AttributeStore,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
}
