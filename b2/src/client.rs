//! Client for the B2 bindings executable

use crate::catalog::{self, ResourceName};
use crate::config::Credentials;
use crate::records::Record;
use std::sync::Arc;
use tfbridge::{
    decode, encode, populate, redact, AttributeStore, BridgeError, Casing, Executable,
    FieldDescriptor, Invoker, Operation, Registry, Result, Tree,
};

/// Environment variable the bindings append to their user agent
pub const USER_AGENT_ENV: &str = "B2_USER_AGENT_APPEND";

/// Cheap to clone; handlers each hold one
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    invoker: Invoker,
    credentials: Credentials,
    registry: Registry<ResourceName>,
}

impl Client {
    pub fn new(executable: Executable, credentials: Credentials, user_agent: &str) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                invoker: Invoker::new(executable).with_env(USER_AGENT_ENV, user_agent),
                credentials,
                registry: catalog::registry(),
            }),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    pub fn executable(&self) -> &Executable {
        self.inner.invoker.executable()
    }

    /// Run one operation and decode its answer
    pub async fn apply<I: Record, O: Record>(&self, op: Operation, input: &I) -> Result<O> {
        let resource = I::RESOURCE;
        let stdout = self.run(resource, op, input).await?;

        let tree = Tree::from_json(&stdout)?;
        let output: O = decode(&tree, Casing::External)?;

        let descriptors = self.descriptors(resource, op)?;
        tracing::debug!(
            resource = %resource,
            op = %op,
            output = ?redact(&encode(&output, Casing::Snake), descriptors),
            "Safe output from bindings"
        );

        Ok(output)
    }

    /// Run one operation whose answer carries nothing, such as a delete
    pub async fn execute<I: Record>(&self, op: Operation, input: &I) -> Result<()> {
        self.run(I::RESOURCE, op, input).await.map(|_| ())
    }

    /// Copy the visible fields of `output` into `store`
    ///
    /// `output` is already a typed record, so keys missing from the wire
    /// answer were decoded to zero values and populate as such.
    pub fn populate<O: Record>(
        &self,
        op: Operation,
        output: &O,
        store: &mut AttributeStore,
    ) -> Result<()> {
        tracing::info!(resource = %O::RESOURCE, op = %op, "Populating data from bindings");

        let descriptors = self.descriptors(O::RESOURCE, op)?;
        populate(&encode(output, Casing::Snake), descriptors, store)
    }

    async fn run<I: Record>(&self, resource: ResourceName, op: Operation, input: &I) -> Result<Vec<u8>> {
        if let Ok(descriptors) = self.descriptors(resource, op) {
            tracing::debug!(
                resource = %resource,
                op = %op,
                input = ?redact(&encode(input, Casing::Snake), descriptors),
                "Input for bindings"
            );
        }

        let body = request_body(input, &self.inner.credentials)?;
        self.inner
            .invoker
            .invoke(resource.as_str(), op, &body)
            .await
    }

    fn descriptors(&self, resource: ResourceName, op: Operation) -> Result<&[FieldDescriptor]> {
        self.inner
            .registry
            .descriptors(resource, op.surface())
            .ok_or_else(|| BridgeError::SchemaNotFound(resource.type_name()))
    }
}

/// Encoded input plus the provider credentials, as one JSON object
fn request_body<I: Record>(input: &I, credentials: &Credentials) -> Result<Vec<u8>> {
    let mut tree = encode(input, Casing::External);
    let map = tree
        .as_map_mut()
        .ok_or_else(|| BridgeError::Custom("input record must encode as a map".to_string()))?;

    map.insert(
        "provider_application_key_id".to_string(),
        Tree::from(credentials.application_key_id.as_str()),
    );
    map.insert(
        "provider_application_key".to_string(),
        Tree::from(credentials.application_key.as_str()),
    );
    map.insert(
        "provider_endpoint".to_string(),
        Tree::from(credentials.endpoint.as_str()),
    );

    tree.to_json()
}
