use super::respond;
use crate::client::Client;
use crate::records::{BucketFileSignedUrlInput, BucketFileSignedUrlOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, DataSource, Operation, Result, Schema, SchemaBuilder,
};

pub struct BucketFileSignedUrlDataSource {
    client: Client,
}

impl BucketFileSignedUrlDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 signed URL for a bucket file data source.")
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
                AttributeBuilder::number("duration")
                    .description("The duration for which the presigned URL is valid.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("signed_url")
                    .description("The signed URL for the given file.")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn sign(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input: BucketFileSignedUrlInput = config.to_record()?;
        let mut output: BucketFileSignedUrlOutput = self
            .client
            .apply(Operation::DataSourceRead, &input)
            .await?;
        output.input = input;

        let mut state = config.clone();
        state.set_id(output.signed_url.clone());
        self.client
            .populate(Operation::DataSourceRead, &output, &mut state)?;
        Ok(state)
    }
}

#[async_trait]
impl DataSource for BucketFileSignedUrlDataSource {
    fn type_name(&self) -> &str {
        "b2_bucket_file_signed_url"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.sign(&request.config).await;
        respond(request.config, result)
    }
}
