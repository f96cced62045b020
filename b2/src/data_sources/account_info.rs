//! Account info data source
//!
//! Describes the account and the capabilities of the key the provider is
//! configured with.

use super::respond;
use crate::blocks;
use crate::client::Client;
use crate::records::{AccountInfoInput, AccountInfoOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributePath, AttributeStore, DataSource, Operation, Result, Schema,
    SchemaBuilder, Tree,
};

pub struct AccountInfoDataSource {
    client: Client,
}

impl AccountInfoDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 account info data source.")
            .attribute(
                AttributeBuilder::string("account_id")
                    .description("The identifier for the account.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("account_auth_token")
                    .description("An authorization token to use with all calls, other than b2_authorize_account, that need an Authorization header.")
                    .computed()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_url")
                    .description("The base URL to use for all API calls except for uploading and downloading files.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("allowed", blocks::allowed())
                    .description("The capabilities of the current key.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("download_url")
                    .description("The base URL to use for downloading files.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("s3_api_url")
                    .description("The base URL to use for S3-compatible API calls.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("recommended_part_size")
                    .description("The recommended size for each part of a large file.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("absolute_minimum_part_size")
                    .description("The smallest possible size of a part of a large file (except the last one).")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn read_account(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let output: AccountInfoOutput = self
            .client
            .apply(Operation::DataSourceRead, &AccountInfoInput::default())
            .await?;

        let mut state = config.clone();
        state.set_id(output.account_id.clone());
        self.client
            .populate(Operation::DataSourceRead, &output, &mut state)?;
        project_first_bucket(&output, &mut state)?;
        Ok(state)
    }
}

/// Fill the single-bucket fields of `allowed[0]` from its first bucket
fn project_first_bucket(output: &AccountInfoOutput, state: &mut AttributeStore) -> Result<()> {
    let Some(allowed) = output.allowed.first() else {
        return Ok(());
    };
    let (id, name) = allowed
        .buckets
        .first()
        .map(|bucket| (bucket.id.as_str(), bucket.name.as_str()))
        .unwrap_or(("", ""));

    let first = AttributePath::new("allowed").index(0);
    state.set_path(&first.clone().attribute("bucket_id"), Tree::from(id))?;
    state.set_path(&first.attribute("bucket_name"), Tree::from(name))?;
    Ok(())
}

#[async_trait]
impl DataSource for AccountInfoDataSource {
    fn type_name(&self) -> &str {
        "b2_account_info"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.read_account(&request.config).await;
        respond(request.config, result)
    }
}
