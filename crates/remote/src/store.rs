use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use study_core::model::{
    CardId, Difficulty, StudentId, Subject, SubjectDraft, SubjectError, SubjectId,
};

/// Errors surfaced by store adapters.
///
/// `Unreachable` is the non-fatal "backend is down" case callers recover
/// from with local data; `Rejected` names the operation for the blocking
/// alert the session surfaces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("{operation} rejected by backend (status {status})")]
    Rejected { operation: &'static str, status: u16 },

    #[error("malformed response for {operation}: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation}: backend returned no data")]
    NotFound { operation: &'static str },
}

/// Transfer shape for a backend flashcard.
///
/// This mirrors the backend row so store adapters can serialize without
/// leaking wire concerns into the domain layer; services attach the
/// subject name when mapping into a domain `Card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub id: CardId,
    pub subject_id: SubjectId,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub answer: String,
}

/// Fields for creating or replacing a backend flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCardRecord {
    pub subject_id: SubjectId,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub answer: String,
}

/// Store contract for subjects (decks on the backend).
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// List the subjects owned by a student, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend is unreachable or replies
    /// with a non-success status.
    async fn list_subjects(&self, owner: StudentId) -> Result<Vec<Subject>, StoreError>;

    /// Create a subject and return the server-assigned record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` when the backend refuses the draft.
    async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, StoreError>;

    /// Delete a subject; the backend cascades to its cards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure or rejection.
    async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError>;
}

/// Store contract for flashcards.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// List the cards of a subject, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend is unreachable or replies
    /// with a non-success status.
    async fn list_cards(&self, subject: SubjectId) -> Result<Vec<CardRecord>, StoreError>;

    /// Create a card and return the server-assigned record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` when the backend refuses the record.
    async fn create_card(&self, record: &NewCardRecord) -> Result<CardRecord, StoreError>;

    /// Replace a card's fields, returning the authoritative record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure or rejection.
    async fn update_card(
        &self,
        id: CardId,
        record: &NewCardRecord,
    ) -> Result<CardRecord, StoreError>;

    /// Delete a card.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on transport failure or rejection.
    async fn delete_card(&self, id: CardId) -> Result<(), StoreError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

#[derive(Default)]
struct InMemoryState {
    subjects: Vec<Subject>,
    cards: HashMap<u64, CardRecord>,
    card_order: Vec<u64>,
    next_subject_id: u64,
    next_card_id: u64,
}

/// In-memory store standing in for the backend in tests.
///
/// Assigns ids the way the backend would and cascades subject deletion
/// to the subject's cards.
pub struct InMemoryStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                next_subject_id: 1,
                next_card_id: 1,
                ..InMemoryState::default()
            }),
        }
    }

    /// Pre-populates a subject, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError` when the draft fails domain validation.
    pub fn seed_subject(&self, draft: &SubjectDraft) -> Result<Subject, SubjectError> {
        let mut state = self.state.lock().expect("in-memory store poisoned");
        let id = SubjectId::new(state.next_subject_id);
        state.next_subject_id += 1;
        let subject = Subject::new(
            id,
            draft.name(),
            Some(draft.description().to_owned()),
            draft.owner(),
            None,
        )?;
        state.subjects.push(subject.clone());
        Ok(subject)
    }

    /// Pre-populates a card, returning the stored record.
    pub fn seed_card(&self, record: &NewCardRecord) -> CardRecord {
        let mut state = self.state.lock().expect("in-memory store poisoned");
        let id = state.next_card_id;
        state.next_card_id += 1;
        let stored = CardRecord {
            id: CardId::new(id),
            subject_id: record.subject_id,
            topic: record.topic.clone(),
            difficulty: record.difficulty,
            question: record.question.clone(),
            answer: record.answer.clone(),
        };
        state.cards.insert(id, stored.clone());
        state.card_order.push(id);
        stored
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubjectStore for InMemoryStore {
    async fn list_subjects(&self, owner: StudentId) -> Result<Vec<Subject>, StoreError> {
        let state = self.state.lock().expect("in-memory store poisoned");
        Ok(state
            .subjects
            .iter()
            .filter(|subject| subject.owner() == owner)
            .cloned()
            .collect())
    }

    async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, StoreError> {
        // Unique deck names, like the backend schema.
        {
            let state = self.state.lock().expect("in-memory store poisoned");
            if state.subjects.iter().any(|s| s.name() == draft.name()) {
                return Err(StoreError::Rejected {
                    operation: "create subject",
                    status: 400,
                });
            }
        }
        self.seed_subject(draft).map_err(|err| StoreError::Decode {
            operation: "create subject",
            detail: err.to_string(),
        })
    }

    async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("in-memory store poisoned");
        let before = state.subjects.len();
        state.subjects.retain(|subject| subject.id() != id);
        if state.subjects.len() == before {
            return Err(StoreError::NotFound {
                operation: "delete subject",
            });
        }
        // Cascade, as the backend does.
        state.cards.retain(|_, card| card.subject_id != id);
        let remaining: Vec<u64> = state.cards.keys().copied().collect();
        state.card_order.retain(|card_id| remaining.contains(card_id));
        Ok(())
    }
}

#[async_trait]
impl CardStore for InMemoryStore {
    async fn list_cards(&self, subject: SubjectId) -> Result<Vec<CardRecord>, StoreError> {
        let state = self.state.lock().expect("in-memory store poisoned");
        Ok(state
            .card_order
            .iter()
            .filter_map(|id| state.cards.get(id))
            .filter(|card| card.subject_id == subject)
            .cloned()
            .collect())
    }

    async fn create_card(&self, record: &NewCardRecord) -> Result<CardRecord, StoreError> {
        let known_subject = {
            let state = self.state.lock().expect("in-memory store poisoned");
            state
                .subjects
                .iter()
                .any(|subject| subject.id() == record.subject_id)
        };
        if !known_subject {
            return Err(StoreError::Rejected {
                operation: "create card",
                status: 400,
            });
        }
        Ok(self.seed_card(record))
    }

    async fn update_card(
        &self,
        id: CardId,
        record: &NewCardRecord,
    ) -> Result<CardRecord, StoreError> {
        let mut state = self.state.lock().expect("in-memory store poisoned");
        let Some(stored) = state.cards.get_mut(&id.value()) else {
            return Err(StoreError::NotFound {
                operation: "update card",
            });
        };
        stored.subject_id = record.subject_id;
        stored.topic = record.topic.clone();
        stored.difficulty = record.difficulty;
        stored.question = record.question.clone();
        stored.answer = record.answer.clone();
        Ok(stored.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("in-memory store poisoned");
        if state.cards.remove(&id.value()).is_none() {
            return Err(StoreError::NotFound {
                operation: "delete card",
            });
        }
        state.card_order.retain(|stored| *stored != id.value());
        Ok(())
    }
}
