//! Backend-assigned identifiers.
//!
//! The backend hands out plain unsigned integers for decks, flashcards,
//! and students; each gets its own newtype so a card id can never be
//! passed where a subject id belongs. IDs render as bare numbers (they
//! are spliced into endpoint paths) and parse from text for CLI flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that could not be read as a backend identifier, e.g. a
/// malformed `--student-id` flag. Carries the offending input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{input:?} is not a valid {kind} (expected an unsigned integer)")]
pub struct ParseIdError {
    kind: &'static str,
    input: String,
}

impl ParseIdError {
    /// Which identifier type the input was parsed as.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

macro_rules! backend_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        // Bare number, so ids splice directly into endpoint paths.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                    input: s.to_owned(),
                })
            }
        }
    };
}

backend_id!(
    /// Backend id of a subject (a deck row).
    SubjectId
);

backend_id!(
    /// Backend id of a flashcard row.
    CardId
);

backend_id!(
    /// Backend id of the student who owns the subjects.
    StudentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_splice_into_endpoint_paths_as_bare_numbers() {
        let path = format!("flashcards/deck/{}/", SubjectId::new(3));
        assert_eq!(path, "flashcards/deck/3/");
    }

    #[test]
    fn debug_names_the_id_kind() {
        assert_eq!(format!("{:?}", CardId::new(9)), "CardId(9)");
        assert_eq!(format!("{:?}", StudentId::new(1)), "StudentId(1)");
    }

    #[test]
    fn parse_failure_reports_kind_and_offending_input() {
        let err = "7d".parse::<StudentId>().unwrap_err();
        assert_eq!(err.kind(), "StudentId");
        assert_eq!(err.input(), "7d");
        assert_eq!(
            err.to_string(),
            "\"7d\" is not a valid StudentId (expected an unsigned integer)"
        );
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let id: CardId = " 42 ".parse().unwrap();
        assert_eq!(id, CardId::new(42));
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert!("-1".parse::<SubjectId>().is_err());
    }
}
