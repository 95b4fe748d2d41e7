use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discrete lifecycle step notifications. Stateless; any event payload lives
/// in the [`DocumentEvent`] metadata map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentEventType {
    SaveToDatabase,
    SaveToStorage,
    SaveComplete,
    ProcessStart,
    ProcessComplete,
    ProcessFailed,
    IndexComplete,
}

impl DocumentEventType {
    pub const ALL: [DocumentEventType; 7] = [
        DocumentEventType::SaveToDatabase,
        DocumentEventType::SaveToStorage,
        DocumentEventType::SaveComplete,
        DocumentEventType::ProcessStart,
        DocumentEventType::ProcessComplete,
        DocumentEventType::ProcessFailed,
        DocumentEventType::IndexComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentEventType::SaveToDatabase => "SAVE_TO_DATABASE",
            DocumentEventType::SaveToStorage => "SAVE_TO_STORAGE",
            DocumentEventType::SaveComplete => "SAVE_COMPLETE",
            DocumentEventType::ProcessStart => "PROCESS_START",
            DocumentEventType::ProcessComplete => "PROCESS_COMPLETE",
            DocumentEventType::ProcessFailed => "PROCESS_FAILED",
            DocumentEventType::IndexComplete => "INDEX_COMPLETE",
        }
    }
}

impl fmt::Display for DocumentEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable notification that a lifecycle step occurred for a document.
///
/// The metadata map is opaque to the state machine; it carries event-specific
/// payload (failure reason, storage path, ...) for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub document_id: Uuid,
    pub event_type: DocumentEventType,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn new(document_id: Uuid, event_type: DocumentEventType) -> Self {
        Self::with_metadata(document_id, event_type, HashMap::new())
    }

    pub fn with_metadata(
        document_id: Uuid,
        event_type: DocumentEventType,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            document_id,
            event_type,
            metadata,
            occurred_at: Utc::now(),
        }
    }
}
