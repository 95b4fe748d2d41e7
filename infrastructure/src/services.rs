//! Uniformly guarded collaborator services.
//!
//! Each wrapper is applied once at construction time, so every call site
//! reaches the collaborator through the classification boundary without
//! per-call configuration. Callers only ever observe [`DocumentError`].

use std::sync::Arc;

use bytes::Bytes;
use common::{document::DocumentEvent, error::DocumentError};
use uuid::Uuid;

use crate::boundary::guard;
use crate::clients::{MessagingClient, OcrClient, SearchIndexClient, StorageClient};

#[derive(Clone)]
pub struct GuardedStorage {
    inner: Arc<dyn StorageClient>,
}

impl GuardedStorage {
    pub fn new(inner: Arc<dyn StorageClient>) -> Self {
        Self { inner }
    }

    pub async fn put_object(&self, location: &str, data: Bytes) -> Result<(), DocumentError> {
        guard("StorageClient.put_object", self.inner.put_object(location, data)).await
    }

    pub async fn get_object(&self, location: &str) -> Result<Bytes, DocumentError> {
        guard("StorageClient.get_object", self.inner.get_object(location)).await
    }

    pub async fn object_exists(&self, location: &str) -> Result<bool, DocumentError> {
        guard("StorageClient.object_exists", self.inner.object_exists(location)).await
    }

    pub async fn delete_prefix(&self, prefix: &str) -> Result<(), DocumentError> {
        guard("StorageClient.delete_prefix", self.inner.delete_prefix(prefix)).await
    }
}

#[derive(Clone)]
pub struct GuardedSearchIndex {
    inner: Arc<dyn SearchIndexClient>,
}

impl GuardedSearchIndex {
    pub fn new(inner: Arc<dyn SearchIndexClient>) -> Self {
        Self { inner }
    }

    pub async fn index_document(
        &self,
        document_id: Uuid,
        body: &serde_json::Value,
    ) -> Result<(), DocumentError> {
        guard(
            "SearchIndexClient.index_document",
            self.inner.index_document(document_id, body),
        )
        .await
    }

    pub async fn remove_document(&self, document_id: Uuid) -> Result<(), DocumentError> {
        guard(
            "SearchIndexClient.remove_document",
            self.inner.remove_document(document_id),
        )
        .await
    }
}

#[derive(Clone)]
pub struct GuardedOcr {
    inner: Arc<dyn OcrClient>,
}

impl GuardedOcr {
    pub fn new(inner: Arc<dyn OcrClient>) -> Self {
        Self { inner }
    }

    pub async fn extract_text(&self, data: &Bytes) -> Result<String, DocumentError> {
        guard("OcrClient.extract_text", self.inner.extract_text(data)).await
    }
}

#[derive(Clone)]
pub struct GuardedMessaging {
    inner: Arc<dyn MessagingClient>,
}

impl GuardedMessaging {
    pub fn new(inner: Arc<dyn MessagingClient>) -> Self {
        Self { inner }
    }

    pub async fn publish_event(&self, event: &DocumentEvent) -> Result<(), DocumentError> {
        guard("MessagingClient.publish_event", self.inner.publish_event(event)).await
    }
}

/// The four collaborators the lifecycle needs, each behind the boundary.
#[derive(Clone)]
pub struct InfrastructureServices {
    pub storage: GuardedStorage,
    pub search: GuardedSearchIndex,
    pub ocr: GuardedOcr,
    pub messaging: GuardedMessaging,
}

impl InfrastructureServices {
    pub fn new(
        storage: Arc<dyn StorageClient>,
        search: Arc<dyn SearchIndexClient>,
        ocr: Arc<dyn OcrClient>,
        messaging: Arc<dyn MessagingClient>,
    ) -> Self {
        Self {
            storage: GuardedStorage::new(storage),
            search: GuardedSearchIndex::new(search),
            ocr: GuardedOcr::new(ocr),
            messaging: GuardedMessaging::new(messaging),
        }
    }
}
