//! Provider configuration

use tfbridge::{AttributeBuilder, AttributeStore, Schema, SchemaBuilder};

pub const DEFAULT_ENDPOINT: &str = "production";

/// Credentials injected into every request to the bindings
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub application_key_id: String,
    pub application_key: String,
    pub endpoint: String,
}

impl Credentials {
    /// Read from provider configuration, falling back to the environment
    pub fn resolve(config: &AttributeStore) -> Self {
        let lookup = |attribute: &str, var: &str| {
            config
                .get_str(attribute)
                .filter(|v| !v.is_empty())
                .map(|s| s.to_string())
                .or_else(|| std::env::var(var).ok())
        };

        Self {
            application_key_id: lookup("application_key_id", "B2_APPLICATION_KEY_ID")
                .unwrap_or_default(),
            application_key: lookup("application_key", "B2_APPLICATION_KEY").unwrap_or_default(),
            endpoint: lookup("endpoint", "B2_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }
}

pub fn provider_schema() -> Schema {
    SchemaBuilder::new()
        .description("Terraform provider for Backblaze B2")
        .attribute(
            AttributeBuilder::string("application_key_id")
                .description("B2 Application Key ID (B2_APPLICATION_KEY_ID env)")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("application_key")
                .description("B2 Application Key (B2_APPLICATION_KEY env)")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("endpoint")
                .description(
                    "B2 endpoint - the string 'production' or a custom B2 API URL (B2_ENDPOINT env).",
                )
                .optional()
                .build(),
        )
        .build()
}

/// Appended by the bindings to the user agent of every B2 API call
pub fn user_agent(terraform_version: &str, provider_version: &str) -> String {
    format!(
        "Terraform/{} Terraform-B2-Provider/{}",
        terraform_version, provider_version
    )
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfbridge::Tree;

    fn clear_env() {
        std::env::remove_var("B2_APPLICATION_KEY_ID");
        std::env::remove_var("B2_APPLICATION_KEY");
        std::env::remove_var("B2_ENDPOINT");
    }

    #[test]
    #[serial]
    fn config_values_take_precedence_over_env() {
        std::env::set_var("B2_APPLICATION_KEY_ID", "env-id");
        std::env::set_var("B2_ENDPOINT", "https://api.example.com");

        let mut config = AttributeStore::new(&provider_schema());
        config
            .set("application_key_id", Tree::from("config-id"))
            .unwrap();
        let credentials = Credentials::resolve(&config);

        assert_eq!(credentials.application_key_id, "config-id");
        assert_eq!(credentials.endpoint, "https://api.example.com");

        clear_env();
    }

    #[test]
    #[serial]
    fn endpoint_defaults_to_production() {
        clear_env();

        let config = AttributeStore::new(&provider_schema());
        let credentials = Credentials::resolve(&config);

        assert_eq!(credentials.endpoint, "production");
        assert_eq!(credentials.application_key, "");
    }

    #[test]
    fn user_agent_names_both_versions() {
        assert_eq!(
            user_agent("1.9.0", "0.1.0"),
            "Terraform/1.9.0 Terraform-B2-Provider/0.1.0"
        );
    }

    #[test]
    fn credentials_are_sensitive_in_schema() {
        let schema = provider_schema();
        assert!(schema.attribute("application_key").unwrap().sensitive);
        assert!(!schema.attribute("endpoint").unwrap().sensitive);
    }
}
