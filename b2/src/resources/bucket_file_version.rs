//! B2 bucket file version resource
//!
//! Uploads `source` as a new version of `file_name`. Versions are immutable:
//! changing any argument replaces the resource.

use super::state_id;
use crate::blocks;
use crate::client::Client;
use crate::records::{BucketFileVersionInput, BucketFileVersionOutput, FileEncryption};
use async_trait::async_trait;
use tfbridge::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfbridge::{
    AttributeBuilder, AttributeStore, AttributeType, Diagnostic, Operation, Resource, Result,
    Schema, SchemaBuilder,
};

pub struct BucketFileVersionResource {
    client: Client,
}

impl BucketFileVersionResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("B2 bucket file version resource.")
            .attribute(
                AttributeBuilder::string("bucket_id")
                    .description("The ID of the bucket.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("file_name")
                    .description("The name of the B2 file.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("source")
                    .description("Path to the local file.")
                    .required()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("content_type")
                    .description("Content type. If not set, it will be set based on the file extension.")
                    .optional()
                    .computed()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("file_info", AttributeType::map_of(AttributeType::String))
                    .description("Additional file info.")
                    .optional()
                    .computed()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("server_side_encryption", blocks::file_encryption())
                    .description("Server-side encryption settings.")
                    .optional()
                    .force_new()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("action")
                    .description("One of 'start', 'upload', 'hide', 'folder', or other values added in the future.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("content_md5")
                    .description("MD5 sum of the content.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("content_sha1")
                    .description("SHA1 hash of the content.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("file_id")
                    .description("The file ID.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("size")
                    .description("File size.")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("upload_timestamp")
                    .description("Upload timestamp.")
                    .computed()
                    .build(),
            )
            .build()
    }

    async fn upload(&self, config: &AttributeStore) -> Result<AttributeStore> {
        let input: BucketFileVersionInput = config.to_record()?;
        let mut output: BucketFileVersionOutput = self
            .client
            .apply(Operation::ResourceCreate, &input)
            .await?;
        keep_local_arguments(&mut output, config)?;

        let mut state = config.clone();
        state.set_id(output.file_id.clone());
        self.client
            .populate(Operation::ResourceCreate, &output, &mut state)?;
        Ok(state)
    }

    async fn read_version(&self, current: &AttributeStore) -> Result<AttributeStore> {
        let input = BucketFileVersionInput {
            file_id: state_id(current),
            ..Default::default()
        };
        let mut output: BucketFileVersionOutput = self
            .client
            .apply(Operation::ResourceRead, &input)
            .await?;
        keep_local_arguments(&mut output, current)?;

        let mut state = current.clone();
        self.client
            .populate(Operation::ResourceRead, &output, &mut state)?;
        Ok(state)
    }

    async fn delete_version(&self, prior: &AttributeStore) -> Result<()> {
        let input = BucketFileVersionInput {
            file_id: state_id(prior),
            file_name: prior.get_str("file_name").unwrap_or_default().to_string(),
            ..Default::default()
        };
        self.client
            .execute(Operation::ResourceDelete, &input)
            .await
    }
}

/// The local path and the SSE-C key never come back from B2
fn keep_local_arguments(
    output: &mut BucketFileVersionOutput,
    known: &AttributeStore,
) -> Result<()> {
    output.source = known.get_str("source").unwrap_or_default().to_string();

    let known_encryption: Option<FileEncryption> = known.decode("server_side_encryption")?;
    if let Some(known_encryption) = known_encryption {
        match output.server_side_encryption.as_mut() {
            Some(returned) if returned.key.is_empty() => returned.key = known_encryption.key,
            Some(_) => {}
            None => output.server_side_encryption = Some(known_encryption),
        }
    }
    Ok(())
}

#[async_trait]
impl Resource for BucketFileVersionResource {
    fn type_name(&self) -> &str {
        "b2_bucket_file_version"
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.upload(&request.config).await {
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
        match self.read_version(&request.current_state).await {
            Ok(new_state) => ReadResourceResponse {
                new_state: Some(new_state),
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
                "File versions are immutable; every argument forces replacement",
            )],
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let diagnostics = match self.delete_version(&request.prior_state).await {
            Ok(()) => vec![],
            Err(e) => vec![Diagnostic::from(e)],
        };
        DeleteResourceResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FileEncryptionKey;
    use tfbridge::Tree;

    fn known_state() -> AttributeStore {
        let mut state = AttributeStore::new(&BucketFileVersionResource::schema_static());
        state.set("source", Tree::from("/tmp/a.txt")).unwrap();
        state
            .set(
                "server_side_encryption",
                Tree::from_json(
                    br#"[{"algorithm":"AES256","mode":"SSE-C","key":[{"key_id":"k1","secret_b64":"c2VjcmV0"}]}]"#,
                )
                .unwrap(),
            )
            .unwrap();
        state
    }

    #[test]
    fn source_and_encryption_key_survive_a_read() {
        let mut output = BucketFileVersionOutput {
            file_id: "f1".to_string(),
            server_side_encryption: Some(FileEncryption {
                algorithm: "AES256".to_string(),
                mode: "SSE-C".to_string(),
                key: vec![],
            }),
            ..Default::default()
        };

        keep_local_arguments(&mut output, &known_state()).unwrap();

        assert_eq!(output.source, "/tmp/a.txt");
        let encryption = output.server_side_encryption.unwrap();
        assert_eq!(
            encryption.key,
            vec![FileEncryptionKey {
                key_id: "k1".to_string(),
                secret_b64: "c2VjcmV0".to_string(),
            }]
        );
    }

    #[test]
    fn missing_encryption_in_output_falls_back_to_known_settings() {
        let mut output = BucketFileVersionOutput::default();
        keep_local_arguments(&mut output, &known_state()).unwrap();

        assert_eq!(
            output.server_side_encryption.map(|e| e.mode),
            Some("SSE-C".to_string())
        );
    }
}
