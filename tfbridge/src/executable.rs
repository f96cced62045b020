//! Location of the external executable
//!
//! The executable either already exists on disk or ships embedded in the
//! provider binary. Embedded bytes are written to a temporary file the first
//! time they are needed; every later caller gets the same path.

use crate::error::{BridgeError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tokio::sync::OnceCell;

const EXTRACT_PREFIX: &str = "py-terraform-provider";

/// Cheap handle to a runnable executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable {
    path: Arc<PathBuf>,
}

impl Executable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug)]
enum Source {
    Path(PathBuf),
    Embedded(&'static [u8]),
}

/// Resolves the executable exactly once
///
/// An extracted file lives as long as the `Bindings` value.
#[derive(Debug)]
pub struct Bindings {
    source: Source,
    resolved: OnceCell<(Executable, Option<TempPath>)>,
}

impl Bindings {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Path(path.into()),
            resolved: OnceCell::new(),
        }
    }

    pub fn embedded(content: &'static [u8]) -> Self {
        Self {
            source: Source::Embedded(content),
            resolved: OnceCell::new(),
        }
    }

    pub async fn resolve(&self) -> Result<Executable> {
        let (executable, _) = self
            .resolved
            .get_or_try_init(|| self.source.materialize())
            .await?;
        Ok(executable.clone())
    }
}

impl Source {
    async fn materialize(&self) -> Result<(Executable, Option<TempPath>)> {
        match self {
            Source::Path(path) => Ok((Executable::new(path.clone()), None)),
            Source::Embedded(content) => {
                let content: &'static [u8] = *content;
                let extracted = tokio::task::spawn_blocking(move || extract(content))
                    .await
                    .map_err(|e| BridgeError::Custom(format!("failed to extract bindings: {}", e)))??;
                let executable = Executable::new(extracted.to_path_buf());
                tracing::trace!(path = %executable.path().display(), "Extracted bindings");
                Ok((executable, Some(extracted)))
            }
        }
    }
}

fn extract(content: &[u8]) -> std::io::Result<TempPath> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(EXTRACT_PREFIX);
    if cfg!(windows) {
        builder.suffix(".exe");
    }

    let mut file = builder.tempfile()?;
    file.write_all(content)?;
    file.flush()?;
    let path = file.into_temp_path();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o770))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCRIPT: &[u8] = b"#!/bin/sh\nexit 0\n";

    #[tokio::test]
    async fn existing_path_is_used_as_is() {
        let bindings = Bindings::path("/opt/bindings/b2");
        let executable = bindings.resolve().await.unwrap();
        assert_eq!(executable.path(), Path::new("/opt/bindings/b2"));
    }

    #[tokio::test]
    async fn embedded_content_is_extracted_once() {
        let bindings = Arc::new(Bindings::embedded(SCRIPT));

        let resolves = (0..8).map(|_| {
            let bindings = Arc::clone(&bindings);
            async move { bindings.resolve().await.unwrap() }
        });
        let executables = futures::future::join_all(resolves).await;

        let first = &executables[0];
        assert!(executables.iter().all(|e| e == first));
        assert_eq!(std::fs::read(first.path()).unwrap(), SCRIPT);

        let name = first.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(EXTRACT_PREFIX));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn extracted_file_is_executable_by_owner_and_group() {
        use std::os::unix::fs::PermissionsExt;

        let bindings = Bindings::embedded(SCRIPT);
        let executable = bindings.resolve().await.unwrap();

        let mode = std::fs::metadata(executable.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o770);
    }

    #[tokio::test]
    async fn extracted_file_is_removed_with_bindings() {
        let bindings = Bindings::embedded(SCRIPT);
        let path = bindings.resolve().await.unwrap().path().to_path_buf();
        assert!(path.exists());

        drop(bindings);
        assert!(!path.exists());
    }
}
