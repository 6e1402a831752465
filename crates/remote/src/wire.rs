//! Wire shapes for the deck/flashcard endpoints.
//!
//! The backend wraps success payloads as `{ "data": <payload> }`; a
//! missing `data` key means "no result", not a protocol error. Local
//! field names map onto the backend's:
//! question/answer/topic/difficulty <-> front_text/back_text/category/difficulty_level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use study_core::model::{
    CardId, Difficulty, StudentId, Subject, SubjectDraft, SubjectError, SubjectId,
};

use crate::store::{CardRecord, NewCardRecord};

/// Success envelope; `data` is absent when the backend has no result.
/// serde decodes a missing `Option` field as `None` on its own, which is
/// exactly the "no result" reading.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

//
// ─── SUBJECTS (DECKS) ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct DeckDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DeckDto {
    /// Maps the wire deck into the domain subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError` when the backend sent an empty name.
    pub fn into_subject(self) -> Result<Subject, SubjectError> {
        Subject::new(
            SubjectId::new(self.id),
            self.name,
            self.description,
            StudentId::new(self.owner),
            self.created_at,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DeckPayload<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub owner: u64,
}

impl<'a> DeckPayload<'a> {
    #[must_use]
    pub fn from_draft(draft: &'a SubjectDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description(),
            owner: draft.owner().value(),
        }
    }
}

//
// ─── CARDS (FLASHCARDS) ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardDto {
    pub id: u64,
    pub front_text: String,
    pub back_text: String,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub deck: u64,
}

impl FlashcardDto {
    /// Maps the wire flashcard into a store record.
    ///
    /// An unknown `difficulty_level` falls back to Medium and a missing
    /// `category` to "General", matching what the backend tolerates.
    #[must_use]
    pub fn into_record(self) -> CardRecord {
        let topic = self
            .category
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "General".to_owned());
        CardRecord {
            id: CardId::new(self.id),
            subject_id: SubjectId::new(self.deck),
            topic,
            difficulty: Difficulty::parse_or_medium(self.difficulty_level.as_deref()),
            question: self.front_text,
            answer: self.back_text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlashcardPayload<'a> {
    pub front_text: &'a str,
    pub back_text: &'a str,
    pub difficulty_level: &'a str,
    pub category: &'a str,
    pub deck: u64,
}

impl<'a> FlashcardPayload<'a> {
    #[must_use]
    pub fn from_record(record: &'a NewCardRecord) -> Self {
        Self {
            front_text: &record.question,
            back_text: &record.answer,
            difficulty_level: record.difficulty.as_str(),
            category: &record.topic,
            deck: record.subject_id.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_missing_data_is_no_result() {
        let envelope: Envelope<Vec<DeckDto>> = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn envelope_decodes_payloads_without_a_default() {
        // DeckDto deliberately has no Default impl; the envelope must not
        // require one to represent an absent result.
        let envelope: Envelope<DeckDto> = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn deck_dto_maps_into_subject() {
        let json = r#"{
            "data": {
                "id": 3,
                "name": "Artificial Intelligence",
                "description": "intro course",
                "owner": 1,
                "created_at": "2025-01-02T03:04:05Z"
            }
        }"#;
        let envelope: Envelope<DeckDto> = serde_json::from_str(json).unwrap();
        let subject = envelope.data.unwrap().into_subject().unwrap();

        assert_eq!(subject.id(), SubjectId::new(3));
        assert_eq!(subject.name(), "Artificial Intelligence");
        assert_eq!(subject.description(), Some("intro course"));
        assert_eq!(subject.owner(), StudentId::new(1));
        assert!(subject.created_at().is_some());
    }

    #[test]
    fn deck_dto_tolerates_missing_optional_fields() {
        let json = r#"{"id": 1, "name": "Maths", "owner": 2}"#;
        let dto: DeckDto = serde_json::from_str(json).unwrap();
        let subject = dto.into_subject().unwrap();
        assert_eq!(subject.description(), None);
        assert_eq!(subject.created_at(), None);
    }

    #[test]
    fn flashcard_dto_maps_fields_and_falls_back() {
        let json = r#"{
            "id": 9,
            "front_text": "What does AI stand for?",
            "back_text": "AI stands for Artificial Intelligence.",
            "difficulty_level": "unrated",
            "deck": 3
        }"#;
        let record: CardRecord = serde_json::from_str::<FlashcardDto>(json)
            .unwrap()
            .into_record();

        assert_eq!(record.id, CardId::new(9));
        assert_eq!(record.subject_id, SubjectId::new(3));
        assert_eq!(record.question, "What does AI stand for?");
        assert_eq!(record.difficulty, Difficulty::Medium);
        assert_eq!(record.topic, "General");
    }

    #[test]
    fn flashcard_payload_uses_backend_field_names() {
        let record = NewCardRecord {
            subject_id: SubjectId::new(5),
            topic: "Chapter 1".into(),
            difficulty: Difficulty::Hard,
            question: "Q".into(),
            answer: "A".into(),
        };
        let json = serde_json::to_value(FlashcardPayload::from_record(&record)).unwrap();

        assert_eq!(json["front_text"], "Q");
        assert_eq!(json["back_text"], "A");
        assert_eq!(json["difficulty_level"], "Hard");
        assert_eq!(json["category"], "Chapter 1");
        assert_eq!(json["deck"], 5);
    }

    #[test]
    fn deck_payload_carries_owner() {
        let draft = SubjectDraft::new("Maths", "algebra", StudentId::new(7)).unwrap();
        let json = serde_json::to_value(DeckPayload::from_draft(&draft)).unwrap();
        assert_eq!(json["name"], "Maths");
        assert_eq!(json["description"], "algebra");
        assert_eq!(json["owner"], 7);
    }
}
