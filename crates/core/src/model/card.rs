use std::fmt;

use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag of a card, also the study-session filter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parses a backend `difficulty_level` value.
    ///
    /// The backend stores the level as free text and may omit it entirely,
    /// so anything unrecognized falls back to `Medium`.
    #[must_use]
    pub fn parse_or_medium(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("easy") => Difficulty::Easy,
            Some(s) if s.eq_ignore_ascii_case("hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CARD SOURCE ───────────────────────────────────────────────────────────────
//

/// Where a card came from.
///
/// Seed cards ship with the client for demonstration; they are filtered
/// like any other card but are never persisted, edited, or deleted.
/// Remote cards carry the backend-assigned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSource {
    Seed,
    Remote(CardId),
}

impl CardSource {
    #[must_use]
    pub fn is_seed(&self) -> bool {
        matches!(self, CardSource::Seed)
    }

    /// The backend id, if the card lives on the backend.
    #[must_use]
    pub fn remote_id(&self) -> Option<CardId> {
        match self {
            CardSource::Seed => None,
            CardSource::Remote(id) => Some(*id),
        }
    }
}

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// Input for creating or editing a card, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub answer: String,
}

impl CardDraft {
    /// Validates the draft locally, before any network call.
    ///
    /// # Errors
    ///
    /// Returns `CardValidationError` when question or answer is empty or
    /// whitespace-only.
    pub fn validate(self) -> Result<ValidatedCard, CardValidationError> {
        if self.question.trim().is_empty() {
            return Err(CardValidationError::EmptyQuestion);
        }
        if self.answer.trim().is_empty() {
            return Err(CardValidationError::EmptyAnswer);
        }

        let topic = self.topic.trim();
        let topic = if topic.is_empty() {
            "General".to_owned()
        } else {
            topic.to_owned()
        };

        Ok(ValidatedCard {
            topic,
            difficulty: self.difficulty,
            question: self.question.trim().to_owned(),
            answer: self.answer.trim().to_owned(),
        })
    }
}

/// A card draft that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    topic: String,
    difficulty: Difficulty,
    question: String,
    answer: String,
}

impl ValidatedCard {
    /// Builds the card once the backend has assigned an id.
    #[must_use]
    pub fn assign_remote(self, id: CardId, subject_name: impl Into<String>) -> Card {
        Card {
            source: CardSource::Remote(id),
            subject_name: subject_name.into(),
            topic: self.topic,
            difficulty: self.difficulty,
            question: self.question,
            answer: self.answer,
        }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// A question/answer pair tagged with a difficulty, belonging to one
/// subject (identified by name for display and seed matching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    source: CardSource,
    subject_name: String,
    topic: String,
    difficulty: Difficulty,
    question: String,
    answer: String,
}

impl Card {
    /// Builds a built-in demonstration card.
    #[must_use]
    pub fn seed(
        subject_name: impl Into<String>,
        topic: impl Into<String>,
        difficulty: Difficulty,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            source: CardSource::Seed,
            subject_name: subject_name.into(),
            topic: topic.into(),
            difficulty,
            question: question.into(),
            answer: answer.into(),
        }
    }

    // Accessors
    #[must_use]
    pub fn source(&self) -> CardSource {
        self.source
    }

    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.source.is_seed()
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

//
// ─── CARD VALIDATION ERRORS ────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CardValidationError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
