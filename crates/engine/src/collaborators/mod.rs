//! External services the engine hands work to.
//!
//! Modules:
//! - `directory`: Definition source backed by a directory of JSON/YAML files
//! - `null`: Offline implementations that never reach a service
//!
//! Results come back asynchronously; callers apply them through
//! [`AuthoringSession::apply_resolved_value`](crate::AuthoringSession::apply_resolved_value)
//! or [`CollectionInstance::apply_edit`](crate::CollectionInstance::apply_edit), both of
//! which ignore ids that no longer exist.

mod directory;
mod null;

use std::path::PathBuf;

use tracing::debug;

use formwright_types::{AddressValue, FormDefinition, ImageReference};

use crate::interpreter::FieldEdit;
use crate::serializer::DefinitionError;

pub use directory::DirectorySource;
pub use null::{NullAddressLookup, NullImageStore};

/// Address search backing the `Address` kind.
#[async_trait::async_trait]
pub trait AddressLookup: Send + Sync {
    /// Candidate addresses for a free-text query, best match first.
    async fn search(&self, query: &str) -> Result<Vec<AddressValue>, CollaboratorError>;
}

/// Storage for images attached through `MultiImageUpload`.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads a local file and returns the URL it can be fetched from.
    async fn upload(&self, path: &str) -> Result<String, CollaboratorError>;
}

/// Where named form definitions are fetched from.
#[async_trait::async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<FormDefinition, CollaboratorError>;
}

/// Errors that can occur while talking to a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{service} is not available")]
    Unavailable { service: &'static str },

    #[error("Invalid definition key: '{key}'")]
    InvalidKey { key: String },

    #[error("No definition named '{key}'")]
    NotFound { key: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Service error: {message}")]
    Service { message: String },
}

/// Looks `query` up and turns the best match into an edit for an address field.
///
/// Returns `None` when the lookup found nothing.
pub async fn resolve_address(lookup: &dyn AddressLookup, query: &str) -> Result<Option<FieldEdit>, CollaboratorError> {
    let mut candidates = lookup.search(query).await?;
    debug!(query, candidates = candidates.len(), "address lookup finished");
    if candidates.is_empty() {
        return Ok(None);
    }
    Ok(Some(FieldEdit::SetAddress(candidates.swap_remove(0))))
}

/// Uploads every pending image and returns the list with stored references in place.
///
/// Order is preserved; already stored images are passed through untouched.
pub async fn upload_pending(store: &dyn ImageStore, images: &[ImageReference]) -> Result<Vec<ImageReference>, CollaboratorError> {
    let mut uploaded = Vec::with_capacity(images.len());
    for image in images {
        match image {
            ImageReference::Pending { pending } => {
                let url = store.upload(pending).await?;
                debug!(path = %pending, %url, "image uploaded");
                uploaded.push(ImageReference::stored(url));
            }
            stored => uploaded.push(stored.clone()),
        }
    }
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedLookup(Vec<AddressValue>);

    #[async_trait::async_trait]
    impl AddressLookup for FixedLookup {
        async fn search(&self, _query: &str) -> Result<Vec<AddressValue>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        uploaded: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ImageStore for RecordingStore {
        async fn upload(&self, path: &str) -> Result<String, CollaboratorError> {
            let mut uploaded = self.uploaded.lock().map_err(|_| CollaboratorError::Service {
                message: "poisoned".into(),
            })?;
            uploaded.push(path.to_string());
            Ok(format!("https://cdn.example.test/{}", uploaded.len()))
        }
    }

    #[tokio::test]
    async fn best_address_match_becomes_an_edit() {
        let lookup = FixedLookup(vec![
            AddressValue::new("1 Main St", 40.0, -73.0),
            AddressValue::new("1 Main Ave", 41.0, -74.0),
        ]);
        let edit = resolve_address(&lookup, "1 main").await.expect("lookup succeeds");
        assert_eq!(edit, Some(FieldEdit::SetAddress(AddressValue::new("1 Main St", 40.0, -73.0))));

        let empty = resolve_address(&NullAddressLookup, "anything").await.expect("null lookup succeeds");
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn only_pending_images_are_uploaded() {
        let store = RecordingStore::default();
        let images = vec![
            ImageReference::stored("https://cdn.example.test/existing"),
            ImageReference::pending("/tmp/a.png"),
            ImageReference::pending("/tmp/b.png"),
        ];
        let uploaded = upload_pending(&store, &images).await.expect("upload succeeds");
        assert_eq!(
            uploaded,
            vec![
                ImageReference::stored("https://cdn.example.test/existing"),
                ImageReference::stored("https://cdn.example.test/1"),
                ImageReference::stored("https://cdn.example.test/2"),
            ]
        );
        assert!(uploaded.iter().all(|image| !image.is_pending()));
    }

    #[tokio::test]
    async fn null_store_refuses_uploads() {
        let result = upload_pending(&NullImageStore, &[ImageReference::pending("/tmp/a.png")]).await;
        assert!(matches!(result, Err(CollaboratorError::Unavailable { .. })));
    }
}
