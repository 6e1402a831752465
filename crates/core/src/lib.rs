#![forbid(unsafe_code)]

pub mod model;
pub mod session;

pub use model::{
    Card, CardDraft, CardSource, CardValidationError, Difficulty, Subject, SubjectDraft,
    SubjectError, ValidatedCard,
};
pub use session::{OverlayFsm, SessionCursor, SessionIntent, filter_cards, route_key};
