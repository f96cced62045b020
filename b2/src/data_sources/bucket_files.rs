use super::respond;
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketFilesInput, BucketFilesOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, DataSource, Operation, Result, Schema, SchemaBuilder,
};

pub struct BucketFilesDataSource {
    client: Client,
}

impl BucketFilesDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket files data source.")
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("folder_name")
                    .description("The folder name (B2 file name prefix).")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("show_versions")
                    .description("Show all file versions.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("recursive")
                    .description("Recursive mode.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("file_versions", blocks::file_versions())
                    .description("File versions in the folder.")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn list_files(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input: BucketFilesInput = config.to_record()?;
        let mut output: BucketFilesOutput = self
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
impl DataSource for BucketFilesDataSource {
    fn type_name(&self) -> &str {
        "b2_bucket_files"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.list_files(&request.config).await;
        respond(request.config, result)
    }
}
