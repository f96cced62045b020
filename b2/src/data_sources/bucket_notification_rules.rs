use super::respond;
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketNotificationRulesInput, BucketNotificationRulesOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, DataSource, Operation, Result, Schema, SchemaBuilder,
    Surface,
};

pub struct BucketNotificationRulesDataSource {
    client: Client,
}

impl BucketNotificationRulesDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket notification rules data source.")
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "notification_rules",
                    blocks::notification_rules(Surface::DataSource),
                )
                .description("An array of Event Notification Rules.")
                .computed()
                .build(),
            )
            .build()
    }

    async fn read_rules(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input = BucketNotificationRulesInput {
            bucket_id: config.get_str("bucket_id").unwrap_or_default().to_string(),
            ..Default::default()
        };
        let output: BucketNotificationRulesOutput = self
            .client
            .apply(Operation::DataSourceRead, &input)
            .await?;

        let mut state = config.clone();
        state.set_id(output.bucket_id.clone());
        self.client
            .populate(Operation::DataSourceRead, &output, &mut state)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for BucketNotificationRulesDataSource {
    fn type_name(&self) -> &str {
        "b2_bucket_notification_rules"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.read_rules(&request.config).await;
        respond(request.config, result)
    }
}
