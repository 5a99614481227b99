use formwright_types::AddressValue;

use super::{AddressLookup, CollaboratorError, ImageStore};

/// Address lookup that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAddressLookup;

#[async_trait::async_trait]
impl AddressLookup for NullAddressLookup {
    async fn search(&self, _query: &str) -> Result<Vec<AddressValue>, CollaboratorError> {
        Ok(Vec::new())
    }
}

/// Image store for offline sessions; every upload fails as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullImageStore;

#[async_trait::async_trait]
impl ImageStore for NullImageStore {
    async fn upload(&self, _path: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Unavailable { service: "image store" })
    }
}
