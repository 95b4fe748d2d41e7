pub mod event;
pub mod lifecycle;

pub use event::{DocumentEvent, DocumentEventType};
pub use lifecycle::{transition, DocumentLifecycleState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Lifecycle view of a single document. Holds exactly one state at a time;
/// content bytes live in object storage, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub state: DocumentLifecycleState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: DocumentLifecycleState::Created,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an event to this document, advancing its lifecycle state.
    ///
    /// The caller is responsible for serializing events per document; this
    /// method performs no locking or compare-and-swap.
    pub fn apply(&mut self, event: &DocumentEvent) -> Result<DocumentLifecycleState, DomainError> {
        if event.document_id != self.id {
            return Err(DomainError::Validation {
                field: "document_id".into(),
                message: format!(
                    "event addresses document {} but was applied to {}",
                    event.document_id, self.id
                ),
            });
        }

        let next = transition(self.state, event.event_type)?;
        self.state = next;
        self.updated_at = Utc::now();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_starts_in_created() {
        let document = Document::new(Uuid::new_v4());
        assert_eq!(document.state, DocumentLifecycleState::Created);
        assert!(!document.state.is_terminal());
    }

    #[test]
    fn apply_advances_state_in_place() {
        let id = Uuid::new_v4();
        let mut document = Document::new(id);

        let next = document
            .apply(&DocumentEvent::new(id, DocumentEventType::SaveToDatabase))
            .expect("valid transition");
        assert_eq!(next, DocumentLifecycleState::PersistingDatabase);
        assert_eq!(document.state, DocumentLifecycleState::PersistingDatabase);
    }

    #[test]
    fn apply_rejects_event_for_other_document() {
        let mut document = Document::new(Uuid::new_v4());
        let stranger = DocumentEvent::new(Uuid::new_v4(), DocumentEventType::SaveToDatabase);

        let err = document.apply(&stranger).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "document_id"));
        assert_eq!(document.state, DocumentLifecycleState::Created);
    }

    #[test]
    fn apply_leaves_state_untouched_on_illegal_transition() {
        let id = Uuid::new_v4();
        let mut document = Document::new(id);
        document
            .apply(&DocumentEvent::new(id, DocumentEventType::SaveToDatabase))
            .expect("valid transition");

        let err = document
            .apply(&DocumentEvent::new(id, DocumentEventType::IndexComplete))
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalStateTransition { .. }));
        assert_eq!(document.state, DocumentLifecycleState::PersistingDatabase);
    }
}
