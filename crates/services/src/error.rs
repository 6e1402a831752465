//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{CardValidationError, SubjectError};
use study_core::session::CursorError;
use study_remote::StoreError;

/// Errors emitted by `SubjectCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] SubjectError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `CardMutationGateway`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] CardValidationError),
    #[error("built-in demonstration cards cannot be edited or deleted")]
    SeedImmutable,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `StudySessionController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no subject is selected")]
    NoSubjectSelected,
    #[error("no card is on screen")]
    NoCurrentCard,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

impl SessionError {
    /// True when the error was caught locally, before any network call.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SessionError::NoSubjectSelected
                | SessionError::NoCurrentCard
                | SessionError::Catalog(CatalogError::Validation(_))
                | SessionError::Gateway(GatewayError::Validation(_))
                | SessionError::Gateway(GatewayError::SeedImmutable)
                | SessionError::Cursor(_)
        )
    }
}
