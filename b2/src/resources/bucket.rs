//! B2 bucket resource

use super::{drifted, state_id};
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketInput, BucketOutput};
use async_trait::async_trait;
use tfbridge::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfbridge::{
    AttributeBuilder, AttributeStore, AttributeType, Diagnostic, Operation, Resource, Result,
    Schema, SchemaBuilder, Surface,
};

pub struct BucketResource {
    client: Client,
}

impl BucketResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket resource.")
            .attribute(
                AttributeBuilder::string("bucket_name")
                    .description("The name of the bucket.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_type")
                    .description("The bucket type. Either 'allPublic' or 'allPrivate'.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket_info", AttributeType::map_of(AttributeType::String))
                    .description("User-defined information to be stored with the bucket.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("cors_rules", blocks::cors_rules(Surface::Resource))
                    .description("The initial list of CORS rules for this bucket.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "file_lock_configuration",
                    blocks::file_lock_configuration(Surface::Resource),
                )
                .description("File lock enabled flag, and default retention settings.")
                .optional()
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "default_server_side_encryption",
                    blocks::server_side_encryption(Surface::Resource),
                )
                .description("The default server-side encryption settings for this bucket.")
                .optional()
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::new("lifecycle_rules", blocks::lifecycle_rules(Surface::Resource))
                    .description("The initial list of lifecycle rules for this bucket.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("account_id")
                    .description("Account ID that the bucket belongs to.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("options", AttributeType::set_of(AttributeType::String))
                    .description("List of bucket options.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("revision")
                    .description("Bucket revision.")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn create_bucket(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input: BucketInput = config.to_record()?;
        let output: BucketOutput = self
            .client
            .apply(Operation::ResourceCreate, &input)
            .await?;

        let mut state = config.clone();
        state.set_id(output.bucket_id.clone());
        self.client
            .populate(Operation::ResourceCreate, &output, &mut state)?;
        Ok(state)
    }

    async fn read_bucket(
        &self,
        current: &AttributeStore,
        is_new_resource: bool,
    ) -> Result<Option<AttributeStore>> {
        let id = state_id(current);
        let input = BucketInput {
            bucket_id: id.clone(),
            cors_rules: current.decode("cors_rules")?,
            ..Default::default()
        };
        let output: BucketOutput = self
            .client
            .apply(Operation::ResourceRead, &input)
            .await?;
        if drifted(self.type_name(), &id, &output.bucket_id, is_new_resource) {
            return Ok(None);
        }

        let mut state = current.clone();
        self.client
            .populate(Operation::ResourceRead, &output, &mut state)?;
        Ok(Some(state))
    }

    async fn update_bucket(
        &self,
        prior: &AttributeStore,
        config: &AttributeStore,
    ) -> Result<AttributeStore> {
        let input = BucketInput {
            bucket_id: state_id(prior),
            account_id: prior.get_str("account_id").unwrap_or_default().to_string(),
            bucket_name: String::new(),
            ..config.to_record::<BucketInput>()?
        };
        let output: BucketOutput = self
            .client
            .apply(Operation::ResourceUpdate, &input)
            .await?;

        let mut state = config.clone();
        state.set_id(state_id(prior));
        self.client
            .populate(Operation::ResourceUpdate, &output, &mut state)?;
        Ok(state)
    }

    async fn delete_bucket(&self, prior: &AttributeStore) -> Result<()> {
        let input = BucketInput {
            bucket_id: state_id(prior),
            ..Default::default()
        };
        self.client
            .execute(Operation::ResourceDelete, &input)
            .await
    }
}

#[async_trait]
impl Resource for BucketResource {
    fn type_name(&self) -> &str {
        "b2_bucket"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_bucket(&request.config).await {
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
            .read_bucket(&request.current_state, request.is_new_resource)
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
        match self
            .update_bucket(&request.prior_state, &request.config)
            .await
        {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![Diagnostic::from(e)],
            },
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let diagnostics = match self.delete_bucket(&request.prior_state).await {
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
    fn bucket_name_forces_replacement() {
        let schema = BucketResource::schema_static();
        let name = schema.attribute("bucket_name").unwrap();

        assert!(name.required);
        assert!(name.force_new);
        assert!(!schema.attribute("bucket_type").unwrap().force_new);
    }

    #[test]
    fn every_output_field_has_a_home_in_state() {
        let schema = BucketResource::schema_static();
        let output = tfbridge::encode(&BucketOutput::default(), tfbridge::Casing::Snake);

        for attribute in &schema.attributes {
            assert!(
                output.get(&attribute.name).is_some(),
                "{} missing from output",
                attribute.name
            );
        }
    }
}
