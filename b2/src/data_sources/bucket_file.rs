use super::respond;
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketFileInput, BucketFileOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, DataSource, Operation, Result, Schema, SchemaBuilder,
};

pub struct BucketFileDataSource {
    client: Client,
}

impl BucketFileDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket file data source.")
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("file_name")
                    .description("The file name.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("show_versions")
                    .description("Show all file versions.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("file_versions", blocks::file_versions())
                    .description("File versions.")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn read_file(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input: BucketFileInput = config.to_record()?;
        let mut output: BucketFileOutput = self
            .client
            .apply(Operation::DataSourceRead, &input)
            .await?;
        output.input = input;

        let mut state = config.clone();
        state.set_id(output.sha1.clone());
        self.client
            .populate(Operation::DataSourceRead, &output, &mut state)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for BucketFileDataSource {
    fn type_name(&self) -> &str {
        "b2_bucket_file"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.read_file(&request.config).await;
        respond(request.config, result)
    }
}
