use async_trait::async_trait;
use common::error::BoxedCause;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use super::SearchIndexClient;

#[derive(Error, Debug)]
pub enum SearchIndexError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Index request rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// HTTP client against a JSON search index (Elasticsearch-style document
/// endpoints).
#[derive(Debug, Clone)]
pub struct HttpSearchIndex {
    http: reqwest::Client,
    base_url: Url,
    index: String,
}

impl HttpSearchIndex {
    pub fn new(base_url: &str, index: &str) -> Result<Self, SearchIndexError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            index: index.to_string(),
        })
    }

    fn document_url(&self, document_id: Uuid) -> Result<Url, SearchIndexError> {
        Ok(self
            .base_url
            .join(&format!("{}/_doc/{document_id}", self.index))?)
    }

    pub async fn put_document(
        &self,
        document_id: Uuid,
        body: &serde_json::Value,
    ) -> Result<(), SearchIndexError> {
        let url = self.document_url(document_id)?;
        let response = self.http.put(url).json(body).send().await?;
        Self::ensure_accepted(response).await
    }

    pub async fn delete_document(&self, document_id: Uuid) -> Result<(), SearchIndexError> {
        let url = self.document_url(document_id)?;
        let response = self.http.delete(url).send().await?;
        Self::ensure_accepted(response).await
    }

    async fn ensure_accepted(response: reqwest::Response) -> Result<(), SearchIndexError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SearchIndexError::Rejected { status, body })
    }
}

#[async_trait]
impl SearchIndexClient for HttpSearchIndex {
    async fn index_document(
        &self,
        document_id: Uuid,
        body: &serde_json::Value,
    ) -> Result<(), BoxedCause> {
        self.put_document(document_id, body).await.map_err(Into::into)
    }

    async fn remove_document(&self, document_id: Uuid) -> Result<(), BoxedCause> {
        self.delete_document(document_id).await.map_err(Into::into)
    }
}
