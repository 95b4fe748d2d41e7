//! Collaborator client interfaces.
//!
//! Each trait is the narrow surface the document lifecycle needs from one
//! external subsystem. Implementations surface their failures as the opaque
//! [`BoxedCause`] so classification stays a boundary concern; concrete
//! clients keep their own typed errors underneath.

pub mod messaging;
pub mod ocr;
pub mod search;
pub mod storage;

pub use messaging::{MessagingError, RabbitMqPublisher};
pub use ocr::{CommandLineOcr, OcrError};
pub use search::{HttpSearchIndex, SearchIndexError};
pub use storage::ObjectStoreStorage;

use async_trait::async_trait;
use bytes::Bytes;
use common::{document::DocumentEvent, error::BoxedCause};
use uuid::Uuid;

/// Object storage holding document content bytes.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, location: &str, data: Bytes) -> Result<(), BoxedCause>;

    async fn get_object(&self, location: &str) -> Result<Bytes, BoxedCause>;

    async fn object_exists(&self, location: &str) -> Result<bool, BoxedCause>;

    async fn delete_prefix(&self, prefix: &str) -> Result<(), BoxedCause>;
}

/// Full-text index over processed documents.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    async fn index_document(
        &self,
        document_id: Uuid,
        body: &serde_json::Value,
    ) -> Result<(), BoxedCause>;

    async fn remove_document(&self, document_id: Uuid) -> Result<(), BoxedCause>;
}

/// Optical character recognition over scanned document content.
#[async_trait]
pub trait OcrClient: Send + Sync {
    async fn extract_text(&self, data: &Bytes) -> Result<String, BoxedCause>;
}

/// Broker used to fan lifecycle events out to downstream consumers.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn publish_event(&self, event: &DocumentEvent) -> Result<(), BoxedCause>;
}
