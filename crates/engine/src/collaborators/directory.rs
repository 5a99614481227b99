use std::path::{Path, PathBuf};

use tracing::info;

use formwright_types::FormDefinition;

use super::{CollaboratorError, DefinitionSource};
use crate::serializer::{from_json_str, from_yaml_str, is_yaml_path};

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Definition source reading `<root>/<key>.json`, `.yaml` or `.yml`, in that order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are bare file stems; anything that could escape the root is refused.
    fn validate_key(key: &str) -> Result<(), CollaboratorError> {
        let escapes = key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']);
        if escapes {
            return Err(CollaboratorError::InvalidKey { key: key.to_string() });
        }
        Ok(())
    }

    async fn locate(&self, key: &str) -> Result<PathBuf, CollaboratorError> {
        for extension in EXTENSIONS {
            let candidate = self.root.join(format!("{key}.{extension}"));
            match tokio::fs::try_exists(&candidate).await {
                Ok(true) => return Ok(candidate),
                Ok(false) => {}
                Err(source) => return Err(CollaboratorError::Io { path: candidate, source }),
            }
        }
        Err(CollaboratorError::NotFound { key: key.to_string() })
    }
}

#[async_trait::async_trait]
impl DefinitionSource for DirectorySource {
    async fn fetch(&self, key: &str) -> Result<FormDefinition, CollaboratorError> {
        Self::validate_key(key)?;
        let path = self.locate(key).await?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CollaboratorError::Io { path: path.clone(), source })?;
        let form = if is_yaml_path(&path) { from_yaml_str(&text)? } else { from_json_str(&text)? };
        info!(key, path = %path.display(), "fetched form definition");
        Ok(form)
    }
}
