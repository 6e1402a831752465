#![forbid(unsafe_code)]

pub mod catalog;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod notice;

pub use study_core::session::{
    Control, FocusContext, Key, KeyEvent, Overlay, SHORTCUTS, SessionIntent, Shortcut,
};

pub use catalog::SubjectCatalog;
pub use controller::StudySessionController;
pub use error::{CatalogError, GatewayError, SessionError};
pub use gateway::CardMutationGateway;
pub use notice::{Notice, Severity};
