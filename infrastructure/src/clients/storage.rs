use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use common::{
    error::BoxedCause,
    utils::config::{AppConfig, StorageKind},
};
use futures::{StreamExt, TryStreamExt};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{path::Path as ObjPath, ObjectStore};
use uuid::Uuid;

use super::StorageClient;

/// Object storage for document content bytes.
///
/// Content lives under `documents/{id}/...`; lifecycle state never touches
/// storage. Implements the full [`StorageClient`] contract and nothing more.
#[derive(Clone)]
pub struct ObjectStoreStorage {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreStorage {
    /// Builds the backend named by the configuration. The local backend
    /// resolves a relative `data_dir` against the working directory and
    /// creates it on first use.
    pub async fn new(cfg: &AppConfig) -> object_store::Result<Self> {
        let store: Arc<dyn ObjectStore> = match cfg.storage {
            StorageKind::Local => {
                let base = if cfg.data_dir.starts_with('/') {
                    PathBuf::from(&cfg.data_dir)
                } else {
                    std::env::current_dir()
                        .unwrap_or_else(|_| PathBuf::from("."))
                        .join(&cfg.data_dir)
                };
                if !base.exists() {
                    tokio::fs::create_dir_all(&base).await.map_err(|e| {
                        object_store::Error::Generic {
                            store: "LocalFileSystem",
                            source: e.into(),
                        }
                    })?;
                }
                Arc::new(LocalFileSystem::new_with_prefix(base)?)
            }
            StorageKind::Memory => Arc::new(InMemory::new()),
        };

        Ok(Self { store })
    }

    /// Canonical location of a document's content object.
    pub fn content_location(document_id: Uuid) -> String {
        format!("documents/{document_id}/content")
    }

    /// Prefix covering every object that belongs to a document.
    pub fn document_prefix(document_id: Uuid) -> String {
        format!("documents/{document_id}/")
    }
}

#[async_trait]
impl StorageClient for ObjectStoreStorage {
    async fn put_object(&self, location: &str, data: Bytes) -> Result<(), BoxedCause> {
        let payload = object_store::PutPayload::from_bytes(data);
        self.store
            .put(&ObjPath::from(location), payload)
            .await
            .map(|_| ())
            .map_err(Into::into)
    }

    /// Returns the full contents buffered in memory.
    async fn get_object(&self, location: &str) -> Result<Bytes, BoxedCause> {
        let result = self.store.get(&ObjPath::from(location)).await?;
        result.bytes().await.map_err(Into::into)
    }

    async fn object_exists(&self, location: &str) -> Result<bool, BoxedCause> {
        match self.store.head(&ObjPath::from(location)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), BoxedCause> {
        let prefix = ObjPath::from(prefix);
        let locations = self
            .store
            .list(Some(&prefix))
            .map_ok(|meta| meta.location)
            .boxed();
        self.store
            .delete_stream(locations)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        AppConfig {
            storage: StorageKind::Memory,
            ..Default::default()
        }
    }

    async fn memory_store() -> ObjectStoreStorage {
        ObjectStoreStorage::new(&memory_config())
            .await
            .expect("memory storage")
    }

    #[tokio::test]
    async fn content_round_trips_for_a_document() {
        let storage = memory_store().await;
        let location = ObjectStoreStorage::content_location(Uuid::new_v4());

        storage
            .put_object(&location, Bytes::from_static(b"%PDF-1.7 content"))
            .await
            .expect("put");
        let data = storage.get_object(&location).await.expect("get");

        assert_eq!(data.as_ref(), b"%PDF-1.7 content");
        assert!(storage.object_exists(&location).await.expect("exists"));
    }

    #[tokio::test]
    async fn delete_prefix_removes_only_that_documents_objects() {
        let storage = memory_store().await;
        let doomed = Uuid::new_v4();
        let kept = Uuid::new_v4();
        for id in [doomed, kept] {
            storage
                .put_object(
                    &ObjectStoreStorage::content_location(id),
                    Bytes::from_static(b"bytes"),
                )
                .await
                .expect("put");
        }

        storage
            .delete_prefix(&ObjectStoreStorage::document_prefix(doomed))
            .await
            .expect("delete");

        assert!(!storage
            .object_exists(&ObjectStoreStorage::content_location(doomed))
            .await
            .expect("exists after delete"));
        assert!(storage
            .object_exists(&ObjectStoreStorage::content_location(kept))
            .await
            .expect("other document untouched"));
    }

    #[tokio::test]
    async fn missing_content_surfaces_the_backend_error() {
        let storage = memory_store().await;
        let location = ObjectStoreStorage::content_location(Uuid::new_v4());

        let err = storage.get_object(&location).await.unwrap_err();
        assert!(err.is::<object_store::Error>());
        assert!(!storage.object_exists(&location).await.expect("exists check"));
    }

    #[tokio::test]
    async fn local_backend_persists_under_the_data_dir() {
        let base = format!("/tmp/document_content_store_{}", Uuid::new_v4());
        let cfg = AppConfig {
            storage: StorageKind::Local,
            data_dir: base.clone(),
            ..Default::default()
        };
        let storage = ObjectStoreStorage::new(&cfg).await.expect("local storage");
        let location = ObjectStoreStorage::content_location(Uuid::new_v4());

        storage
            .put_object(&location, Bytes::from_static(b"local bytes"))
            .await
            .expect("put");
        assert_eq!(
            storage.get_object(&location).await.expect("get").as_ref(),
            b"local bytes"
        );
        tokio::fs::metadata(&base).await.expect("data dir created");

        let _ = tokio::fs::remove_dir_all(&base).await;
    }
}
