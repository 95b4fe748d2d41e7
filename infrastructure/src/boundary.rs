//! Error classification at the infrastructure boundary.
//!
//! Every call into a collaborator crosses this module exactly once. Failures
//! are normalized into the closed [`DocumentError`] taxonomy, logged at the
//! point of first classification, and re-raised with the original cause
//! preserved. Already-classified errors pass through untouched so nested
//! boundaries neither double-wrap nor double-log.

use std::future::Future;

use common::error::{BoxedCause, DocumentError, DomainError, InfrastructureError};
use tracing::error;

use crate::clients::{MessagingError, OcrError, SearchIndexError};

/// Maps a collaborator failure to its classified form.
///
/// `operation` is a short diagnostic label of the invoked call, e.g.
/// `"StorageClient.put_object"`. It never influences control flow.
pub fn classify(operation: &str, cause: BoxedCause) -> DocumentError {
    // Rule 1: anything already belonging to the taxonomy passes through
    // unchanged, whether boxed as the root or as a bare branch. Not logged
    // again; the boundary that built it already did, and domain errors are
    // never logged here at all.
    let cause = match cause.downcast::<DocumentError>() {
        Ok(classified) => return *classified,
        Err(cause) => cause,
    };
    let cause = match cause.downcast::<DomainError>() {
        Ok(domain) => return DocumentError::Domain(*domain),
        Err(cause) => cause,
    };
    let cause = match cause.downcast::<InfrastructureError>() {
        Ok(infra) => return DocumentError::Infrastructure(*infra),
        Err(cause) => cause,
    };

    let operation = operation.to_string();
    let classified = if cause.is::<object_store::Error>() {
        InfrastructureError::Storage { operation, cause }
    } else if cause.is::<SearchIndexError>() {
        InfrastructureError::Search { operation, cause }
    } else if cause.is::<OcrError>() {
        InfrastructureError::Ocr { operation, cause }
    } else if cause.is::<MessagingError>() {
        InfrastructureError::Messaging { operation, cause }
    } else {
        InfrastructureError::Other { operation, cause }
    };

    error!(
        operation = classified.operation(),
        cause = %render_chain(&classified),
        "Operation failed: {classified}"
    );

    DocumentError::Infrastructure(classified)
}

/// Awaits a collaborator call and classifies its failure.
///
/// On success the result passes through untouched.
pub async fn guard<T, F>(operation: &str, call: F) -> Result<T, DocumentError>
where
    F: Future<Output = Result<T, BoxedCause>> + Send,
{
    match call.await {
        Ok(value) => Ok(value),
        Err(cause) => Err(classify(operation, cause)),
    }
}

/// Renders the full cause chain of an error for the log line.
fn render_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::DomainError;
    use reqwest::StatusCode;
    use std::error::Error;
    use uuid::Uuid;

    fn storage_cause() -> BoxedCause {
        Box::new(object_store::Error::Generic {
            store: "InMemory",
            source: "connection reset".into(),
        })
    }

    #[test]
    fn storage_client_failures_classify_as_storage() {
        let err = classify("StorageClient.put_object", storage_cause());

        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Storage { .. }));
        assert!(infra.to_string().starts_with("Storage error: "));
        assert!(infra
            .source()
            .expect("cause preserved")
            .is::<object_store::Error>());
    }

    #[test]
    fn search_client_failures_classify_as_search() {
        let cause = SearchIndexError::Rejected {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "index is read-only".into(),
        };
        let err = classify("SearchIndexClient.index_document", Box::new(cause));

        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Search { .. }));
        assert_eq!(
            infra.to_string(),
            "Search error: SearchIndexClient.index_document"
        );
        assert!(infra.source().expect("cause").is::<SearchIndexError>());
    }

    #[test]
    fn ocr_engine_failures_classify_as_ocr() {
        let cause = OcrError::EngineFailure("page segmentation failed".into());
        let err = classify("OcrClient.extract_text", Box::new(cause));

        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Ocr { .. }));
        assert_eq!(infra.to_string(), "OCR error: OcrClient.extract_text");
    }

    #[test]
    fn messaging_failures_classify_as_messaging() {
        let cause = MessagingError::Amqp(lapin::Error::ChannelsLimitReached);
        let err = classify("MessagingClient.publish_event", Box::new(cause));

        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Messaging { .. }));
        assert!(infra.to_string().starts_with("Messaging error: "));
    }

    #[test]
    fn unrecognized_failures_fall_back_to_generic() {
        let cause: BoxedCause = "something nobody anticipated".into();
        let err = classify("StorageClient.get_object", cause);

        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Other { .. }));
        assert_eq!(
            infra.to_string(),
            "Unexpected error in StorageClient.get_object"
        );
        assert_eq!(
            infra.source().expect("cause").to_string(),
            "something nobody anticipated"
        );
    }

    #[test]
    fn already_classified_errors_pass_through_unchanged() {
        let id = Uuid::new_v4();
        let original: BoxedCause = Box::new(DocumentError::Domain(DomainError::NotFound(id)));

        let err = classify("StorageClient.get_object", original);

        // Not re-wrapped as infrastructure; the domain subtype survives.
        assert!(matches!(
            err,
            DocumentError::Domain(DomainError::NotFound(found)) if found == id
        ));
    }

    #[test]
    fn bare_domain_errors_pass_through_unchanged() {
        let id = Uuid::new_v4();
        let cause: BoxedCause = Box::new(DomainError::NotFound(id));

        let err = classify("StorageClient.get_object", cause);

        assert!(matches!(
            err,
            DocumentError::Domain(DomainError::NotFound(found)) if found == id
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn bare_infrastructure_errors_are_not_rewrapped() {
        let cause: BoxedCause = Box::new(InfrastructureError::Search {
            operation: "SearchIndexClient.index_document".into(),
            cause: "shard down".into(),
        });

        let err = classify("DocumentPipeline.index", cause);

        // The original operation label survives; the outer one is ignored.
        let DocumentError::Infrastructure(infra) = err else {
            panic!("expected infrastructure error");
        };
        assert!(matches!(infra, InfrastructureError::Search { .. }));
        assert_eq!(
            infra.to_string(),
            "Search error: SearchIndexClient.index_document"
        );
    }

    #[tokio::test]
    async fn guard_passes_successful_results_through() {
        let value = guard("StorageClient.get_object", async { Ok::<_, BoxedCause>(42) })
            .await
            .expect("success passes through");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn guard_classifies_failures() {
        let err = guard::<(), _>("StorageClient.put_object", async {
            Err(storage_cause())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Infrastructure(InfrastructureError::Storage { .. })
        ));
    }
}
