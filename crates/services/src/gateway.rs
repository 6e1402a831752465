use std::sync::Arc;

use study_core::model::{Card, CardDraft, CardSource, Subject};
use study_remote::{CardRecord, CardStore, NewCardRecord};

use crate::error::GatewayError;

/// Mutation path for cards, against the remote flashcard store.
///
/// Every mutation is confirmed by the backend and the caller patches
/// local state from the authoritative response; nothing is applied
/// optimistically. Seed cards are rejected before any network call.
#[derive(Clone)]
pub struct CardMutationGateway {
    store: Arc<dyn CardStore>,
}

impl CardMutationGateway {
    #[must_use]
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Loads the subject's cards, mapped into domain cards carrying the
    /// subject's name.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Store` when the backend call fails.
    pub async fn load(&self, subject: &Subject) -> Result<Vec<Card>, GatewayError> {
        let records = self.store.list_cards(subject.id()).await?;
        Ok(records
            .into_iter()
            .map(|record| into_card(record, subject.name()))
            .collect())
    }

    /// Creates a card in the subject.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` (empty question/answer) before
    /// any network call; `GatewayError::Store` when the backend rejects
    /// the card.
    pub async fn create(
        &self,
        subject: &Subject,
        draft: CardDraft,
    ) -> Result<Card, GatewayError> {
        let validated = draft.validate()?;
        let record = NewCardRecord {
            subject_id: subject.id(),
            topic: validated.topic().to_owned(),
            difficulty: validated.difficulty(),
            question: validated.question().to_owned(),
            answer: validated.answer().to_owned(),
        };
        let stored = self.store.create_card(&record).await?;
        Ok(into_card(stored, subject.name()))
    }

    /// Replaces a card's fields, returning the authoritative card.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::SeedImmutable` for seed cards and
    /// `GatewayError::Validation` for empty fields, both before any
    /// network call; `GatewayError::Store` on backend failure.
    pub async fn update(
        &self,
        subject: &Subject,
        source: CardSource,
        draft: CardDraft,
    ) -> Result<Card, GatewayError> {
        let Some(id) = source.remote_id() else {
            return Err(GatewayError::SeedImmutable);
        };
        let validated = draft.validate()?;
        let record = NewCardRecord {
            subject_id: subject.id(),
            topic: validated.topic().to_owned(),
            difficulty: validated.difficulty(),
            question: validated.question().to_owned(),
            answer: validated.answer().to_owned(),
        };
        let stored = self.store.update_card(id, &record).await?;
        Ok(into_card(stored, subject.name()))
    }

    /// Deletes a card.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::SeedImmutable` for seed cards before any
    /// network call; `GatewayError::Store` on backend failure.
    pub async fn delete(&self, source: CardSource) -> Result<(), GatewayError> {
        let Some(id) = source.remote_id() else {
            return Err(GatewayError::SeedImmutable);
        };
        self.store.delete_card(id).await?;
        Ok(())
    }
}

fn into_card(record: CardRecord, subject_name: &str) -> Card {
    CardDraft {
        topic: record.topic,
        difficulty: record.difficulty,
        question: record.question,
        answer: record.answer,
    }
    .validate()
    .map(|validated| validated.assign_remote(record.id, subject_name))
    .unwrap_or_else(|_| {
        // The backend enforces non-empty text, but a blank row must not
        // take the whole session down; show it as-is.
        Card::seed(subject_name, "General", record.difficulty, "(blank)", "(blank)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{CardValidationError, Difficulty, StudentId, SubjectDraft};
    use study_remote::InMemoryStore;

    fn subject_on(store: &Arc<InMemoryStore>) -> Subject {
        store
            .seed_subject(&SubjectDraft::new("Rust", "", StudentId::new(1)).unwrap())
            .unwrap()
    }

    fn draft(question: &str, answer: &str, difficulty: Difficulty) -> CardDraft {
        CardDraft {
            topic: String::new(),
            difficulty,
            question: question.into(),
            answer: answer.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_remote_card_with_server_id() {
        let store = Arc::new(InMemoryStore::new());
        let subject = subject_on(&store);
        let gateway = CardMutationGateway::new(store);

        let card = gateway
            .create(&subject, draft("Q", "A", Difficulty::Easy))
            .await
            .unwrap();

        assert!(card.source().remote_id().is_some());
        assert_eq!(card.subject_name(), "Rust");
        assert_eq!(card.topic(), "General");
    }

    #[tokio::test]
    async fn create_rejects_empty_question_without_a_network_call() {
        let store = Arc::new(InMemoryStore::new());
        let subject = subject_on(&store);
        let gateway = CardMutationGateway::new(store.clone());

        let err = gateway
            .create(&subject, draft("  ", "A", Difficulty::Easy))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Validation(CardValidationError::EmptyQuestion)
        ));
        assert!(store.list_cards(subject.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields_on_the_backend() {
        let store = Arc::new(InMemoryStore::new());
        let subject = subject_on(&store);
        let gateway = CardMutationGateway::new(store.clone());

        let card = gateway
            .create(&subject, draft("Q", "A", Difficulty::Easy))
            .await
            .unwrap();
        let updated = gateway
            .update(&subject, card.source(), draft("Q2", "A2", Difficulty::Hard))
            .await
            .unwrap();

        assert_eq!(updated.question(), "Q2");
        assert_eq!(updated.difficulty(), Difficulty::Hard);
        assert_eq!(updated.source(), card.source());
    }

    #[tokio::test]
    async fn seed_cards_cannot_be_updated_or_deleted() {
        let store = Arc::new(InMemoryStore::new());
        let subject = subject_on(&store);
        let gateway = CardMutationGateway::new(store);

        let err = gateway
            .update(&subject, CardSource::Seed, draft("Q", "A", Difficulty::Easy))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::SeedImmutable));

        let err = gateway.delete(CardSource::Seed).await.unwrap_err();
        assert!(matches!(err, GatewayError::SeedImmutable));
    }
}
