mod card;
mod ids;
mod subject;

pub mod seed;

pub use card::{Card, CardDraft, CardSource, CardValidationError, Difficulty, ValidatedCard};
pub use ids::{CardId, ParseIdError, StudentId, SubjectId};
pub use subject::{Subject, SubjectDraft, SubjectError};
