//! Subprocess invocation
//!
//! One call is one process: the executable receives the resource name and
//! operation verb as arguments, the payload on stdin, and answers on stdout.

use crate::error::{BridgeError, Result};
use crate::executable::Executable;
use crate::operation::Operation;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct Invoker {
    executable: Executable,
    env: Vec<(String, String)>,
}

impl Invoker {
    pub fn new(executable: Executable) -> Self {
        Self {
            executable,
            env: Vec::new(),
        }
    }

    /// Extra variable on top of the inherited environment
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    /// Run the executable once and return its stdout
    ///
    /// A non-zero exit becomes [`BridgeError::Diagnostic`] carrying stderr
    /// verbatim, or [`BridgeError::Opaque`] when stderr is empty. Failing to
    /// start the process returns the I/O error untouched.
    pub async fn invoke(
        &self,
        resource: &str,
        operation: Operation,
        input: &[u8],
    ) -> Result<Vec<u8>> {
        tracing::info!(resource, op = %operation, "Executing bindings");

        let mut child = Command::new(self.executable.path())
            .arg(resource)
            .arg(operation.as_str())
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to start bindings");
                BridgeError::Spawn(e)
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Custom("stdin of bindings is not piped".to_string()))?;
        let write = async move {
            let written = stdin.write_all(input).await;
            drop(stdin);
            written
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|e| {
            tracing::error!(error = %e, "Failed to wait for bindings");
            BridgeError::Spawn(e)
        })?;

        // A process that exits without reading all of stdin closes the pipe.
        match written {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(BridgeError::Spawn(e));
            }
            _ => {}
        }

        if output.status.success() {
            return Ok(output.stdout);
        }

        if output.stderr.is_empty() {
            tracing::error!(status = %output.status, "Bindings failed without output");
            return Err(BridgeError::Opaque);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!(stderr = %stderr, "Error in bindings");
        Err(BridgeError::Diagnostic(stderr))
    }
}
