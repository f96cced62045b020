//! B2 application key resource
//!
//! Every argument forces replacement, so there is no in-place update. The
//! secret key is only returned on create and is carried over on later reads.

use super::{drifted, state_id};
use crate::client::Client;
use crate::records::{ApplicationKeyInput, ApplicationKeyOutput};
use async_trait::async_trait;
use tfbridge::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfbridge::{
    AttributeBuilder, AttributeStore, AttributeType, Diagnostic, Operation, Resource, Result,
    Schema, SchemaBuilder,
};

/// Bucket scoping through `bucket_id` needs the older bindings API
const LEGACY_APIVER: &str = "v2";

pub struct ApplicationKeyResource {
    client: Client,
}

impl ApplicationKeyResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 application key resource.")
            .attribute(
                AttributeBuilder::new("capabilities", AttributeType::set_of(AttributeType::String))
                    .description("A set of strings, each one naming a capability the key has.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("key_name")
                    .description("The name of the key.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket_ids", AttributeType::set_of(AttributeType::String))
                    .description("When provided, the new key can only access the specified buckets.")
                    .optional()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name_prefix")
                    .description("When present, restricts access to files whose names start with the prefix.")
                    .optional()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("application_key")
                    .description("The key.")
                    .computed()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("application_key_id")
                    .description("The ID of the newly created key.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("options", AttributeType::set_of(AttributeType::String))
                    .description("List of application key options.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("When present, restricts access to one bucket.")
                    .optional()
                    .force_new()
                    .deprecated("This argument is deprecated in favor of 'bucket_ids' argument")
                    .build(),
            )
            .build()
    }

    async fn create_key(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let mut input: ApplicationKeyInput = config.to_record()?;
        if !input.bucket_id.is_empty() {
            input.apiver = LEGACY_APIVER.to_string();
        }

        let output: ApplicationKeyOutput = self
            .client
            .apply(Operation::ResourceCreate, &input)
            .await?;

        let mut state = config.clone();
        state.set_id(output.application_key_id.clone());
        self.client
            .populate(Operation::ResourceCreate, &output, &mut state)?;
        Ok(state)
    }

    async fn read_key(
        &self,
        current: &AttributeStore,
        is_new_resource: bool,
    ) -> Result<Option<AttributeStore>> {
        let id = state_id(current);
        let input = ApplicationKeyInput {
            application_key_id: id.clone(),
            ..Default::default()
        };
        let mut output: ApplicationKeyOutput = self
            .client
            .apply(Operation::ResourceRead, &input)
            .await?;
        if drifted(self.type_name(), &id, &output.application_key_id, is_new_resource) {
            return Ok(None);
        }

        output.application_key = current
            .get_str("application_key")
            .unwrap_or_default()
            .to_string();

        let mut state = current.clone();
        self.client
            .populate(Operation::ResourceRead, &output, &mut state)?;
        Ok(Some(state))
    }

    async fn delete_key(&self, prior: &AttributeStore) -> Result<()> {
        let input = ApplicationKeyInput {
            application_key_id: state_id(prior),
            ..Default::default()
        };
        self.client
            .execute(Operation::ResourceDelete, &input)
            .await
    }
}

#[async_trait]
impl Resource for ApplicationKeyResource {
    fn type_name(&self) -> &str {
        "b2_application_key"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_key(&request.config).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => CreateResourceResponse {
                new_state: request.config,
                diagnostics: vec![Diagnostic::from(e)],
            },
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        match self
            .read_key(&request.current_state, request.is_new_resource)
            .await
        {
            Ok(new_state) => ReadResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: vec![Diagnostic::from(e)],
            },
        }
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.prior_state,
            diagnostics: vec![Diagnostic::error(
                "Update not supported",
                "Application keys cannot be changed in place; every argument forces replacement",
            )],
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let diagnostics = match self.delete_key(&request.prior_state).await {
            Ok(()) => vec![],
            Err(e) => vec![Diagnostic::from(e)],
        };
        DeleteResourceResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_arguments_force_replacement() {
        let schema = ApplicationKeyResource::schema_static();
        for attribute in schema.attributes.iter().filter(|a| a.required || a.optional) {
            assert!(attribute.force_new, "{} does not force replacement", attribute.name);
        }
    }

    #[test]
    fn key_secret_is_sensitive_and_computed() {
        let schema = ApplicationKeyResource::schema_static();
        let key = schema.attribute("application_key").unwrap();

        assert!(key.sensitive);
        assert!(key.computed);
    }
}
