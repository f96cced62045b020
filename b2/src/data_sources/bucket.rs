use super::respond;
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketInput, BucketOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, AttributeType, DataSource, Operation, Result, Schema,
    SchemaBuilder, Surface,
};

pub struct BucketDataSource {
    client: Client,
}

impl BucketDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket data source.")
            .attribute(
                AttributeBuilder::string("bucket_name")
                    .description("The name of the bucket.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("account_id")
                    .description("Account ID that the bucket belongs to.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket_info", AttributeType::map_of(AttributeType::String))
                    .description("User-defined information stored with the bucket.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("bucket_type")
                    .description("The bucket type.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("cors_rules", blocks::cors_rules(Surface::DataSource))
                    .description("The list of CORS rules for this bucket.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "default_server_side_encryption",
                    blocks::server_side_encryption(Surface::DataSource),
                )
                .description("The default server-side encryption settings of this bucket.")
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "file_lock_configuration",
                    blocks::file_lock_configuration(Surface::DataSource),
                )
                .description("The file lock configuration of this bucket.")
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "lifecycle_rules",
                    blocks::lifecycle_rules(Surface::DataSource),
                )
                .description("The list of lifecycle rules for this bucket.")
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

    async fn read_bucket(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input = BucketInput {
            bucket_name: config.get_str("bucket_name").unwrap_or_default().to_string(),
            ..Default::default()
        };
        let output: BucketOutput = self
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
impl DataSource for BucketDataSource {
    fn type_name(&self) -> &str {
        "b2_bucket"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.read_bucket(&request.config).await;
        respond(request.config, result)
    }
}
