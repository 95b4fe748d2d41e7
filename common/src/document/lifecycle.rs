use std::fmt;

use serde::{Deserialize, Serialize};
use state_machines::state_machine;

use crate::error::DomainError;

use super::DocumentEventType;

/// The stage a document occupies in its save/process/index pipeline.
///
/// The happy path is strictly linear; `Failed` is an absorbing escape state
/// reachable from every non-terminal stage. `Indexed` and `Failed` are
/// terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentLifecycleState {
    #[default]
    Created,
    PersistingDatabase,
    PersistingStorage,
    Saved,
    Processing,
    Processed,
    Indexed,
    Failed,
}

impl DocumentLifecycleState {
    pub const ALL: [DocumentLifecycleState; 8] = [
        DocumentLifecycleState::Created,
        DocumentLifecycleState::PersistingDatabase,
        DocumentLifecycleState::PersistingStorage,
        DocumentLifecycleState::Saved,
        DocumentLifecycleState::Processing,
        DocumentLifecycleState::Processed,
        DocumentLifecycleState::Indexed,
        DocumentLifecycleState::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentLifecycleState::Created => "CREATED",
            DocumentLifecycleState::PersistingDatabase => "PERSISTING_DATABASE",
            DocumentLifecycleState::PersistingStorage => "PERSISTING_STORAGE",
            DocumentLifecycleState::Saved => "SAVED",
            DocumentLifecycleState::Processing => "PROCESSING",
            DocumentLifecycleState::Processed => "PROCESSED",
            DocumentLifecycleState::Indexed => "INDEXED",
            DocumentLifecycleState::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DocumentLifecycleState::Indexed | DocumentLifecycleState::Failed
        )
    }
}

impl fmt::Display for DocumentLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod machine {
    use super::state_machine;

    state_machine! {
        name: DocumentLifecycleMachine,
        initial: Created,
        states: [Created, PersistingDatabase, PersistingStorage, Saved, Processing, Processed, Indexed, Failed],
        events {
            save_to_database {
                transition: { from: Created, to: PersistingDatabase }
            }
            save_to_storage {
                transition: { from: PersistingDatabase, to: PersistingStorage }
            }
            save_complete {
                transition: { from: PersistingStorage, to: Saved }
            }
            process_start {
                transition: { from: Saved, to: Processing }
            }
            process_complete {
                transition: { from: Processing, to: Processed }
            }
            index_complete {
                transition: { from: Processed, to: Indexed }
            }
            process_failed {
                transition: { from: Created, to: Failed }
                transition: { from: PersistingDatabase, to: Failed }
                transition: { from: PersistingStorage, to: Failed }
                transition: { from: Saved, to: Failed }
                transition: { from: Processing, to: Failed }
                transition: { from: Processed, to: Failed }
            }
        }
    }

    pub(super) fn created() -> DocumentLifecycleMachine<(), Created> {
        DocumentLifecycleMachine::new(())
    }

    pub(super) fn persisting_database() -> DocumentLifecycleMachine<(), PersistingDatabase> {
        created()
            .save_to_database()
            .expect("save_to_database transition from Created should exist")
    }

    pub(super) fn persisting_storage() -> DocumentLifecycleMachine<(), PersistingStorage> {
        persisting_database()
            .save_to_storage()
            .expect("save_to_storage transition from PersistingDatabase should exist")
    }

    pub(super) fn saved() -> DocumentLifecycleMachine<(), Saved> {
        persisting_storage()
            .save_complete()
            .expect("save_complete transition from PersistingStorage should exist")
    }

    pub(super) fn processing() -> DocumentLifecycleMachine<(), Processing> {
        saved()
            .process_start()
            .expect("process_start transition from Saved should exist")
    }

    pub(super) fn processed() -> DocumentLifecycleMachine<(), Processed> {
        processing()
            .process_complete()
            .expect("process_complete transition from Processing should exist")
    }
}

fn illegal_transition(state: DocumentLifecycleState, event: DocumentEventType) -> DomainError {
    DomainError::IllegalStateTransition { state, event }
}

/// Computes the next lifecycle state for `(state, event)`.
///
/// Pure and deterministic. Any pair outside the transition table, including
/// every event against the terminal `Indexed` and `Failed` states, is
/// rejected with [`DomainError::IllegalStateTransition`]. Rejection signals
/// an orchestrator bug or out-of-order delivery and is never retryable.
pub fn transition(
    state: DocumentLifecycleState,
    event: DocumentEventType,
) -> Result<DocumentLifecycleState, DomainError> {
    use machine::*;
    use DocumentEventType as Event;
    use DocumentLifecycleState as State;

    match (state, event) {
        (State::Created, Event::SaveToDatabase) => created()
            .save_to_database()
            .map(|_| State::PersistingDatabase)
            .map_err(|_| illegal_transition(state, event)),
        (State::PersistingDatabase, Event::SaveToStorage) => persisting_database()
            .save_to_storage()
            .map(|_| State::PersistingStorage)
            .map_err(|_| illegal_transition(state, event)),
        (State::PersistingStorage, Event::SaveComplete) => persisting_storage()
            .save_complete()
            .map(|_| State::Saved)
            .map_err(|_| illegal_transition(state, event)),
        (State::Saved, Event::ProcessStart) => saved()
            .process_start()
            .map(|_| State::Processing)
            .map_err(|_| illegal_transition(state, event)),
        (State::Processing, Event::ProcessComplete) => processing()
            .process_complete()
            .map(|_| State::Processed)
            .map_err(|_| illegal_transition(state, event)),
        (State::Processed, Event::IndexComplete) => processed()
            .index_complete()
            .map(|_| State::Indexed)
            .map_err(|_| illegal_transition(state, event)),
        (State::Created, Event::ProcessFailed) => created()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        (State::PersistingDatabase, Event::ProcessFailed) => persisting_database()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        (State::PersistingStorage, Event::ProcessFailed) => persisting_storage()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        (State::Saved, Event::ProcessFailed) => saved()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        (State::Processing, Event::ProcessFailed) => processing()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        (State::Processed, Event::ProcessFailed) => processed()
            .process_failed()
            .map(|_| State::Failed)
            .map_err(|_| illegal_transition(state, event)),
        _ => Err(illegal_transition(state, event)),
    }
}
