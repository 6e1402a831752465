use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{StudentId, SubjectId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject name cannot be empty")]
    EmptyName,
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A named collection of flashcards owned by one student.
///
/// Subjects are never renamed in place; they are created once and deleted
/// whole (the backend cascades the delete to the subject's cards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    description: Option<String>,
    owner: StudentId,
    created_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// Creates a new Subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        description: Option<String>,
        owner: StudentId,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            owner,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn owner(&self) -> StudentId {
        self.owner
    }

    /// Creation timestamp as reported by the backend, when it sent one.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Input for creating a subject, validated before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
    name: String,
    description: String,
    owner: StudentId,
}

impl SubjectDraft {
    /// Validates the draft locally.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` for an empty or whitespace-only
    /// name, so the caller can surface the problem without a round trip.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner: StudentId,
    ) -> Result<Self, SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }
        Ok(Self {
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            owner,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn owner(&self) -> StudentId {
        self.owner
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
