//! Terraform provider for Backblaze B2
//!
//! Every operation is delegated to the B2 bindings executable through
//! [`tfbridge`]. This crate declares the schemas and typed records and holds
//! the per-resource rules for ids, drift and backward compatibility.

pub mod blocks;
pub mod catalog;
pub mod client;
pub mod config;
pub mod data_sources;
pub mod logging;
pub mod records;
pub mod resources;

pub use client::Client;
pub use config::Credentials;
pub use logging::init_logging;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::OnceLock;
use tfbridge::provider::{ConfigureProviderRequest, ConfigureProviderResponse};
use tfbridge::{Bindings, DataSource, Diagnostic, Provider, Resource, Schema};

pub struct B2Provider {
    bindings: Bindings,
    version: String,
    client: Option<Client>,
}

impl B2Provider {
    /// The bindings are resolved on configure; an embedded executable is
    /// extracted then and removed when the provider is dropped.
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            version: env!("CARGO_PKG_VERSION").to_string(),
            client: None,
        }
    }

    /// Provider version reported in the user agent
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }
}

#[async_trait]
impl Provider for B2Provider {
    fn schema(&self) -> Schema {
        config::provider_schema()
    }

    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];

        let credentials = Credentials::resolve(&request.config);
        let user_agent = config::user_agent(&request.terraform_version, &self.version);
        tracing::info!(user_agent_append = %user_agent, "User Agent append");

        match self.bindings.resolve().await {
            Ok(executable) => {
                self.client = Some(Client::new(executable, credentials, &user_agent));
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to prepare B2 bindings",
                    e.to_string(),
                ));
            }
        }

        ConfigureProviderResponse { diagnostics }
    }

    async fn create_resource(&self, type_name: &str) -> tfbridge::Result<Box<dyn Resource>> {
        let client = self
            .client
            .as_ref()
            .ok_or("Provider not configured")?
            .clone();

        match type_name {
            "b2_application_key" => Ok(Box::new(resources::ApplicationKeyResource::new(client))),
            "b2_bucket" => Ok(Box::new(resources::BucketResource::new(client))),
            "b2_bucket_file_version" => {
                Ok(Box::new(resources::BucketFileVersionResource::new(client)))
            }
            "b2_bucket_notification_rules" => Ok(Box::new(
                resources::BucketNotificationRulesResource::new(client),
            )),
            _ => Err(format!("Unknown resource: {}", type_name).into()),
        }
    }

    async fn create_data_source(&self, type_name: &str) -> tfbridge::Result<Box<dyn DataSource>> {
        let client = self
            .client
            .as_ref()
            .ok_or("Provider not configured")?
            .clone();

        match type_name {
            "b2_account_info" => Ok(Box::new(data_sources::AccountInfoDataSource::new(client))),
            "b2_application_key" => {
                Ok(Box::new(data_sources::ApplicationKeyDataSource::new(client)))
            }
            "b2_bucket" => Ok(Box::new(data_sources::BucketDataSource::new(client))),
            "b2_bucket_file" => Ok(Box::new(data_sources::BucketFileDataSource::new(client))),
            "b2_bucket_files" => Ok(Box::new(data_sources::BucketFilesDataSource::new(client))),
            "b2_bucket_file_signed_url" => Ok(Box::new(
                data_sources::BucketFileSignedUrlDataSource::new(client),
            )),
            "b2_bucket_notification_rules" => Ok(Box::new(
                data_sources::BucketNotificationRulesDataSource::new(client),
            )),
            _ => Err(format!("Unknown data source: {}", type_name).into()),
        }
    }

    fn resource_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: OnceLock<HashMap<String, Schema>> = OnceLock::new();

        SCHEMAS
            .get_or_init(|| {
                HashMap::from([
                    (
                        "b2_application_key".to_string(),
                        resources::ApplicationKeyResource::schema_static(),
                    ),
                    (
                        "b2_bucket".to_string(),
                        resources::BucketResource::schema_static(),
                    ),
                    (
                        "b2_bucket_file_version".to_string(),
                        resources::BucketFileVersionResource::schema_static(),
                    ),
                    (
                        "b2_bucket_notification_rules".to_string(),
                        resources::BucketNotificationRulesResource::schema_static(),
                    ),
                ])
            })
            .clone()
    }

    fn data_source_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: OnceLock<HashMap<String, Schema>> = OnceLock::new();

        SCHEMAS
            .get_or_init(|| {
                HashMap::from([
                    (
                        "b2_account_info".to_string(),
                        data_sources::AccountInfoDataSource::schema_static(),
                    ),
                    (
                        "b2_application_key".to_string(),
                        data_sources::ApplicationKeyDataSource::schema_static(),
                    ),
                    (
                        "b2_bucket".to_string(),
                        data_sources::BucketDataSource::schema_static(),
                    ),
                    (
                        "b2_bucket_file".to_string(),
                        data_sources::BucketFileDataSource::schema_static(),
                    ),
                    (
                        "b2_bucket_files".to_string(),
                        data_sources::BucketFilesDataSource::schema_static(),
                    ),
                    (
                        "b2_bucket_file_signed_url".to_string(),
                        data_sources::BucketFileSignedUrlDataSource::schema_static(),
                    ),
                    (
                        "b2_bucket_notification_rules".to_string(),
                        data_sources::BucketNotificationRulesDataSource::schema_static(),
                    ),
                ])
            })
            .clone()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfbridge::{AttributeStore, Tree};

    fn configure_request(config: AttributeStore) -> ConfigureProviderRequest {
        ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config,
        }
    }

    fn empty_config() -> AttributeStore {
        AttributeStore::new(&config::provider_schema())
    }

    #[tokio::test]
    #[serial]
    async fn provider_configures_successfully_with_env_vars() {
        std::env::set_var("B2_APPLICATION_KEY_ID", "kid");
        std::env::set_var("B2_APPLICATION_KEY", "secret");

        let mut provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));
        let response = provider.configure(configure_request(empty_config())).await;

        assert!(response.diagnostics.is_empty());
        let credentials = provider.client().unwrap().credentials();
        assert_eq!(credentials.application_key_id, "kid");
        assert_eq!(credentials.application_key, "secret");
        assert_eq!(credentials.endpoint, "production");

        std::env::remove_var("B2_APPLICATION_KEY_ID");
        std::env::remove_var("B2_APPLICATION_KEY");
    }

    #[tokio::test]
    #[serial]
    async fn provider_config_overrides_endpoint() {
        std::env::remove_var("B2_ENDPOINT");

        let mut config = empty_config();
        config
            .set("endpoint", Tree::from("https://api.backblazeb2.example"))
            .unwrap();

        let mut provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));
        provider.configure(configure_request(config)).await;

        assert_eq!(
            provider.client().unwrap().credentials().endpoint,
            "https://api.backblazeb2.example"
        );
    }

    #[tokio::test]
    async fn factories_require_configuration() {
        let provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));

        let err = provider.create_resource("b2_bucket").await.err().unwrap();
        assert_eq!(err.to_string(), "Provider not configured");
        assert!(provider.create_data_source("b2_bucket").await.is_err());
    }

    #[tokio::test]
    #[serial]
    async fn factories_build_every_declared_type() {
        let mut provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));
        provider.configure(configure_request(empty_config())).await;

        for name in provider.resource_schemas().keys() {
            let resource = provider.create_resource(name).await.unwrap();
            assert_eq!(resource.type_name(), name);
        }
        for name in provider.data_source_schemas().keys() {
            let data_source = provider.create_data_source(name).await.unwrap();
            assert_eq!(data_source.type_name(), name);
        }
    }

    #[tokio::test]
    #[serial]
    async fn unknown_type_is_rejected() {
        let mut provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));
        provider.configure(configure_request(empty_config())).await;

        let err = provider.create_resource("b2_bucket_file").await.err().unwrap();
        assert_eq!(err.to_string(), "Unknown resource: b2_bucket_file");
    }

    #[test]
    fn catalog_matches_schema_maps() {
        let provider = B2Provider::new(Bindings::path("/opt/b2/bindings"));

        assert_eq!(provider.resource_schemas().len(), 4);
        assert_eq!(provider.data_source_schemas().len(), 7);
        assert!(provider.schema().attribute("application_key").unwrap().sensitive);
    }
}
