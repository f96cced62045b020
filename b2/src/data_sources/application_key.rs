use super::respond;
use crate::client::Client;
use crate::records::{ApplicationKeyInput, ApplicationKeyOutput};
use async_trait::async_trait;
use tfbridge::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfbridge::{
    AttributeBuilder, AttributeStore, AttributeType, DataSource, Operation, Result, Schema,
    SchemaBuilder, Tree,
};

pub struct ApplicationKeyDataSource {
    client: Client,
}

impl ApplicationKeyDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 application key data source.")
            .attribute(
                AttributeBuilder::string("key_name")
                    .description("The name assigned when the key was created.")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("application_key_id")
                    .description("The ID of the key.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket_ids", AttributeType::set_of(AttributeType::String))
                    .description("When present, restricts access to the specified buckets.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("capabilities", AttributeType::set_of(AttributeType::String))
                    .description("A set of strings, each one naming a capability the key has.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name_prefix")
                    .description("When present, restricts access to files whose names start with the prefix.")
                    .optional()
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
                    .computed()
                    .deprecated("This attribute is deprecated in favor of 'bucket_ids' attribute")
                    .build(),
            )
            .build()
    }

    async fn read_key(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input = ApplicationKeyInput {
            key_name: config.get_str("key_name").unwrap_or_default().to_string(),
            ..Default::default()
        };
        let output: ApplicationKeyOutput = self
            .client
            .apply(Operation::DataSourceRead, &input)
            .await?;

        let mut state = config.clone();
        state.set_id(output.application_key_id.clone());
        self.client
            .populate(Operation::DataSourceRead, &output, &mut state)?;
        state.set("bucket_id", Tree::from(legacy_bucket_id(&output)))?;
        Ok(state)
    }
}

/// Single bucket restriction for configurations written before `bucket_ids`
fn legacy_bucket_id(output: &ApplicationKeyOutput) -> &str {
    if !output.bucket_id.is_empty() {
        return &output.bucket_id;
    }
    output.bucket_ids.first().map(String::as_str).unwrap_or("")
}

#[async_trait]
impl DataSource for ApplicationKeyDataSource {
    fn type_name(&self) -> &str {
        "b2_application_key"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let result = self.read_key(&request.config).await;
        respond(request.config, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_bucket_id_prefers_explicit_value() {
        let output = ApplicationKeyOutput {
            bucket_id: "b0".to_string(),
            bucket_ids: vec!["b1".to_string()],
            ..Default::default()
        };
        assert_eq!(legacy_bucket_id(&output), "b0");
    }

    #[test]
    fn legacy_bucket_id_falls_back_to_first_bucket() {
        let output = ApplicationKeyOutput {
            bucket_ids: vec!["b1".to_string(), "b2".to_string()],
            ..Default::default()
        };
        assert_eq!(legacy_bucket_id(&output), "b1");
        assert_eq!(legacy_bucket_id(&ApplicationKeyOutput::default()), "");
    }
}
