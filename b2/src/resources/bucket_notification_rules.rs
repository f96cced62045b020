//! B2 bucket notification rules resource

use super::{drifted, state_id};
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketNotificationRulesInput, BucketNotificationRulesOutput};
use async_trait::async_trait;
use tfbridge::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfbridge::{
    AttributeBuilder, AttributeStore, Diagnostic, Operation, Resource, Result, Schema,
    SchemaBuilder, Surface,
};

pub struct BucketNotificationRulesResource {
    client: Client,
}

impl BucketNotificationRulesResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket notification rules resource.")
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "notification_rules",
                    blocks::notification_rules(Surface::Resource),
                )
                .description("An array of Event Notification Rules.")
                .required()
                .build(),
            )
            .build()
    }

    async fn put_rules(
        &self,
        op: Operation,
        bucket_id: String,
        config: &AttributeStore,
    ) -> Result<AttributeStore> {
        let input = BucketNotificationRulesInput {
            bucket_id,
            notification_rules: config.decode("notification_rules")?,
        };
        let output: BucketNotificationRulesOutput = self.client.apply(op, &input).await?;

        let mut state = config.clone();
        state.set_id(output.bucket_id.clone());
        self.client.populate(op, &output, &mut state)?;
        Ok(state)
    }

    async fn read_rules(
        &self,
        current: &AttributeStore,
        is_new_resource: bool,
    ) -> Result<Option<AttributeStore>> {
        let id = state_id(current);
        let input = BucketNotificationRulesInput {
            bucket_id: id.clone(),
            ..Default::default()
        };
        let output: BucketNotificationRulesOutput = self
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

    async fn delete_rules(&self, prior: &AttributeStore) -> Result<()> {
        let input = BucketNotificationRulesInput {
            bucket_id: state_id(prior),
            ..Default::default()
        };
        self.client
            .execute(Operation::ResourceDelete, &input)
            .await
    }
}

#[async_trait]
impl Resource for BucketNotificationRulesResource {
    fn type_name(&self) -> &str {
        "b2_bucket_notification_rules"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        let bucket_id = request
            .config
            .get_str("bucket_id")
            .unwrap_or_default()
            .to_string();
        match self
            .put_rules(Operation::ResourceCreate, bucket_id, &request.config)
            .await
        {
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
            .read_rules(&request.current_state, request.is_new_resource)
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
        let bucket_id = state_id(&request.prior_state);
        match self
            .put_rules(Operation::ResourceUpdate, bucket_id, &request.config)
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
        let diagnostics = match self.delete_rules(&request.prior_state).await {
            Ok(()) => vec![],
            Err(e) => vec![Diagnostic::from(e)],
        };
        DeleteResourceResponse { diagnostics }
    }
}
